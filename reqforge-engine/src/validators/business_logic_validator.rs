//! Business Logic Validator
//!
//! Decomposition and delivery readiness:
//! - capabilities should be decomposed into enablers (suggestion, low)
//! - enablers need an implementation plan and acceptance criteria
//!   (warning, medium each)

use crate::models::{is_present, CorpusContext, Document};
use crate::types::{CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase};
use tracing::debug;

/// Business Logic Validator
#[derive(Debug, Default, Clone, Copy)]
pub struct BusinessLogicValidator;

impl BusinessLogicValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RuleChecker for BusinessLogicValidator {
    fn phase(&self) -> ValidationPhase {
        ValidationPhase::BusinessLogic
    }

    fn check(
        &self,
        document: &Document,
        _corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError> {
        let mut findings = Vec::new();

        match document {
            Document::Capability(capability) if capability.enablers.is_empty() => {
                findings.push(
                    Finding::suggestion(
                        FindingCategory::DecompositionSuggested,
                        Severity::Low,
                        "enablers",
                        "Capability has no enablers",
                    )
                    .with_suggestion("Break the capability down into enablers"),
                );
            }
            Document::Enabler(enabler) => {
                if !is_present(enabler.implementation_plan.as_deref()) {
                    findings.push(
                        Finding::warning(
                            FindingCategory::MissingImplementationPlan,
                            Severity::Medium,
                            "implementationPlan",
                            "Enabler has no implementation plan",
                        )
                        .with_suggestion("Outline the implementation approach"),
                    );
                }
                if !is_present(enabler.acceptance_criteria.as_deref()) {
                    findings.push(
                        Finding::warning(
                            FindingCategory::MissingAcceptanceCriteria,
                            Severity::Medium,
                            "acceptanceCriteria",
                            "Enabler has no acceptance criteria",
                        )
                        .with_suggestion("State how completion will be verified"),
                    );
                }
            }
            _ => {}
        }

        debug!(
            document_id = ?document.id(),
            findings = findings.len(),
            "Business logic validation complete"
        );

        Ok(findings)
    }
}
