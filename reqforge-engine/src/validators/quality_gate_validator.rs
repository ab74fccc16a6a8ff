//! Quality Gate Validator
//!
//! # Gates
//! - **Approval before implementation**: a document whose status is
//!   implementation-class (In Implementation, Implemented, Deployed) must
//!   carry `approval = Approved` (error, critical). Only kinds that carry
//!   an approval field are gated; a missing approval counts as not approved.
//! - **Requirement balance** (enablers): functional requirements without
//!   any non-functional ones get a suggestion (low); the reverse gets a
//!   warning (medium).

use crate::catalog::{self, rules_for, APPROVED, QUALITY_GATES};
use crate::models::{CorpusContext, Document};
use crate::types::{CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase};
use tracing::debug;

/// Quality Gate Validator
#[derive(Debug, Default, Clone, Copy)]
pub struct QualityGateValidator;

impl QualityGateValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RuleChecker for QualityGateValidator {
    fn phase(&self) -> ValidationPhase {
        ValidationPhase::QualityGates
    }

    fn check(
        &self,
        document: &Document,
        _corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError> {
        let mut findings = Vec::new();
        let rules = rules_for(document.kind());

        if QUALITY_GATES.requires_approval_for_implementation && rules.carries_approval {
            if let Some(status) = document.status().map(str::trim) {
                let approved = document.approval().map(str::trim) == Some(APPROVED);
                if catalog::is_implementation_status(status) && !approved {
                    findings.push(
                        Finding::error(
                            FindingCategory::MissingApprovalForImplementation,
                            Severity::Critical,
                            "approval",
                            format!(
                                "{} has status '{}' but is not approved",
                                rules.kind.label(),
                                status
                            ),
                        )
                        .with_actual(document.approval().unwrap_or_default())
                        .with_suggestion("Obtain approval before moving to implementation"),
                    );
                }
            }
        }

        if let Document::Enabler(enabler) = document {
            let functional = enabler.functional_requirements.len();
            let non_functional = enabler.non_functional_requirements.len();

            if functional > 0 && non_functional == 0 {
                findings.push(
                    Finding::suggestion(
                        FindingCategory::MissingNonFunctionalRequirements,
                        Severity::Low,
                        "nonFunctionalRequirements",
                        format!(
                            "Enabler has {} functional requirement(s) but no non-functional requirements",
                            functional
                        ),
                    )
                    .with_suggestion("Consider performance, security or availability requirements"),
                );
            } else if non_functional > 0 && functional == 0 {
                findings.push(
                    Finding::warning(
                        FindingCategory::MissingFunctionalRequirements,
                        Severity::Medium,
                        "functionalRequirements",
                        format!(
                            "Enabler has {} non-functional requirement(s) but no functional requirements",
                            non_functional
                        ),
                    )
                    .with_suggestion("Describe the behavior the enabler provides"),
                );
            }
        }

        debug!(
            document_id = ?document.id(),
            findings = findings.len(),
            "Quality gate validation complete"
        );

        Ok(findings)
    }
}
