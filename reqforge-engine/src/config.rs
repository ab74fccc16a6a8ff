//! Engine configuration
//!
//! Built from the `[engine]` table of the TOML config, then adjusted by
//! environment overrides.
//!
//! **Priority:** ENV → TOML → compiled defaults
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `REQFORGE_CACHE_ENABLED` | `cache_enabled` |
//! | `REQFORGE_CACHE_TTL_MS` | `cache_ttl` |
//! | `REQFORGE_CACHE_MAX_ENTRIES` | `cache_max_entries` |
//! | `REQFORGE_MAX_CONCURRENT_CHECKS` | `max_concurrent_checks` |
//! | `REQFORGE_MAX_CONCURRENT_VALIDATIONS` | `max_concurrent_validations` |

use crate::error::{EngineError, EngineResult};
use reqforge_common::config::EngineSettings;
use reqforge_common::time::millis_to_duration;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const ENV_CACHE_ENABLED: &str = "REQFORGE_CACHE_ENABLED";
pub const ENV_CACHE_TTL_MS: &str = "REQFORGE_CACHE_TTL_MS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "REQFORGE_CACHE_MAX_ENTRIES";
pub const ENV_MAX_CONCURRENT_CHECKS: &str = "REQFORGE_MAX_CONCURRENT_CHECKS";
pub const ENV_MAX_CONCURRENT_VALIDATIONS: &str = "REQFORGE_MAX_CONCURRENT_VALIDATIONS";

/// Validated engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub cache_enabled: bool,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    /// Per-document checker slots
    pub max_concurrent_checks: usize,
    /// Engine-wide validation slots
    pub max_concurrent_validations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for EngineConfig {
    fn from(settings: &EngineSettings) -> Self {
        Self {
            cache_enabled: settings.cache_enabled,
            cache_ttl: millis_to_duration(settings.cache_ttl_ms),
            cache_max_entries: settings.cache_max_entries,
            max_concurrent_checks: settings.max_concurrent_checks,
            max_concurrent_validations: settings.max_concurrent_validations,
        }
    }
}

impl EngineConfig {
    /// Build from TOML settings plus environment overrides, validated
    pub fn resolve(settings: &EngineSettings) -> EngineResult<Self> {
        let config = Self::from(settings).with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `REQFORGE_*` environment overrides
    ///
    /// Unset or blank variables are ignored; unparseable values are errors.
    pub fn with_env_overrides(mut self) -> EngineResult<Self> {
        if let Some(enabled) = env_override::<bool>(ENV_CACHE_ENABLED)? {
            self.cache_enabled = enabled;
        }
        if let Some(ttl_ms) = env_override::<u64>(ENV_CACHE_TTL_MS)? {
            self.cache_ttl = millis_to_duration(ttl_ms);
        }
        if let Some(max_entries) = env_override::<usize>(ENV_CACHE_MAX_ENTRIES)? {
            self.cache_max_entries = max_entries;
        }
        if let Some(checks) = env_override::<usize>(ENV_MAX_CONCURRENT_CHECKS)? {
            self.max_concurrent_checks = checks;
        }
        if let Some(validations) = env_override::<usize>(ENV_MAX_CONCURRENT_VALIDATIONS)? {
            self.max_concurrent_validations = validations;
        }
        Ok(self)
    }

    /// Reject limits that would stall or disable the engine
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_concurrent_checks == 0 {
            return Err(EngineError::Config(
                "max_concurrent_checks must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_validations == 0 {
            return Err(EngineError::Config(
                "max_concurrent_validations must be at least 1".to_string(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(EngineError::Config(
                "cache_max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Disable caching
    pub fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_limits(mut self, max_concurrent_checks: usize, max_concurrent_validations: usize) -> Self {
        self.max_concurrent_checks = max_concurrent_checks;
        self.max_concurrent_validations = max_concurrent_validations;
        self
    }
}

fn env_override<T>(name: &str) -> EngineResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value = raw
        .parse::<T>()
        .map_err(|e| EngineError::Config(format!("{}='{}': {}", name, raw, e)))?;
    info!(variable = name, value = raw, "Engine setting overridden from environment");
    Ok(Some(value))
}
