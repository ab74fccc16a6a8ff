//! Engine services
//!
//! Leaves first: cache, dependency graph walker and slot pools are used by
//! the orchestrator; batch validation and auto-fix advice sit on top.

pub mod auto_fix_advisor;
pub mod batch_validator;
pub mod concurrency;
pub mod dependency_graph;
pub mod precision_engine;
pub mod quality_scorer;
pub mod validation_cache;

pub use auto_fix_advisor::{generate_auto_fix_suggestions, AutoFixSuggestion};
pub use batch_validator::{BatchReport, BatchSummary};
pub use concurrency::{ConcurrencyLimiter, SlotGuard};
pub use dependency_graph::{detect_cycle, has_cycle, CycleCheck};
pub use precision_engine::{EngineStats, PrecisionEngine};
pub use validation_cache::{CacheStats, ValidationCache};
