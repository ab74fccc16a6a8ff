//! reqforge-engine library interface
//!
//! Rule-based validation of capability / enabler / requirement documents:
//! cached, concurrency-bounded, with cycle detection, quality scoring and
//! auto-fix advice.
//!
//! ```rust,ignore
//! let engine = PrecisionEngine::new(EngineConfig::default())?;
//! let corpus = CorpusContext::new(documents.clone());
//! let report = engine.batch_validate(&documents, Some(&corpus)).await;
//! let fixes = generate_auto_fix_suggestions(&report.results, Some(&corpus));
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod types;
pub mod validators;

pub use crate::config::EngineConfig;
pub use crate::error::{EngineError, EngineResult};
pub use crate::models::{CorpusContext, Document, DocumentKind};
pub use crate::services::{
    generate_auto_fix_suggestions, AutoFixSuggestion, BatchReport, BatchSummary, EngineStats,
    PrecisionEngine,
};
pub use crate::types::{
    Finding, FindingCategory, FindingKind, RuleChecker, Severity, ValidationPhase,
    ValidationResult,
};
