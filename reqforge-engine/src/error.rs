//! Error types for reqforge-engine
//!
//! Validation itself never fails: data problems and checker faults come back
//! as findings. These errors cover engine construction and the deadline
//! wrapper.

use std::time::Duration;
use thiserror::Error;

/// Engine result type
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Engine error type
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation did not finish before the caller's deadline
    #[error("Validation incomplete: deadline of {}ms exceeded", .0.as_millis())]
    DeadlineExceeded(Duration),

    /// reqforge-common error
    #[error("Common error: {0}")]
    Common(#[from] reqforge_common::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::Config("max_concurrent_checks must be at least 1".into()).to_string(),
            "Configuration error: max_concurrent_checks must be at least 1"
        );
        assert_eq!(
            EngineError::DeadlineExceeded(Duration::from_millis(250)).to_string(),
            "Validation incomplete: deadline of 250ms exceeded"
        );

        let common: EngineError = reqforge_common::Error::InvalidInput("bad".into()).into();
        assert!(matches!(common, EngineError::Common(_)));
    }
}
