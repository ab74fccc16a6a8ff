//! Rule checkers
//!
//! One module per rule family. `default_checkers` returns them in
//! aggregation order.

pub mod business_logic_validator;
pub mod content_validator;
pub mod quality_gate_validator;
pub mod relationship_validator;
pub mod structural_validator;

pub use business_logic_validator::BusinessLogicValidator;
pub use content_validator::ContentValidator;
pub use quality_gate_validator::QualityGateValidator;
pub use relationship_validator::RelationshipValidator;
pub use structural_validator::StructuralValidator;

use crate::types::RuleChecker;
use std::sync::Arc;

/// The five built-in checkers: structure, content, relationships,
/// quality gates, business logic
pub fn default_checkers() -> Vec<Arc<dyn RuleChecker>> {
    vec![
        Arc::new(StructuralValidator::new()),
        Arc::new(ContentValidator::new()),
        Arc::new(RelationshipValidator::new()),
        Arc::new(QualityGateValidator::new()),
        Arc::new(BusinessLogicValidator::new()),
    ]
}
