//! Structural Validator
//!
//! Checks the fixed shape of a document against its catalog row.
//!
//! # Checks
//! 1. **Required fields**: present and non-blank (error, high)
//! 2. **Id format**: matches the kind's pattern (error, high)
//! 3. **Status**: in the kind's vocabulary (error, medium)
//! 4. **Priority**: in the shared vocabulary (error, medium)
//!
//! Format checks only run on values that are present; an absent value is
//! already reported by the required-field check.

use crate::catalog::{self, rules_for};
use crate::models::{is_present, CorpusContext, Document};
use crate::types::{CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase};
use tracing::debug;

/// Structural Validator
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralValidator;

impl StructuralValidator {
    pub fn new() -> Self {
        Self
    }
}

impl RuleChecker for StructuralValidator {
    fn phase(&self) -> ValidationPhase {
        ValidationPhase::Structure
    }

    fn check(
        &self,
        document: &Document,
        _corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError> {
        let rules = rules_for(document.kind());
        let mut findings = check_required_fields(
            |name| document.text_field(name),
            rules.required_fields,
            "",
        );

        if let Some(id) = document.id().filter(|id| !id.trim().is_empty()) {
            if !rules.matches_id(id) {
                findings.push(
                    Finding::error(
                        FindingCategory::InvalidIdFormat,
                        Severity::High,
                        "id",
                        format!(
                            "{} id '{}' does not match required format {}",
                            rules.kind.label(),
                            id,
                            rules.id_format()
                        ),
                    )
                    .with_actual(id)
                    .with_suggestion(format!("Use an id of the form {}", rules.id_format())),
                );
            }
        }

        if let Some(status) = document.status().filter(|s| !s.trim().is_empty()) {
            if !rules.is_valid_status(status) {
                findings.push(
                    Finding::error(
                        FindingCategory::InvalidStatus,
                        Severity::Medium,
                        "status",
                        format!("Invalid status '{}' for {}", status, rules.kind.label()),
                    )
                    .with_actual(status)
                    .with_suggestion(format!(
                        "Use one of: {}",
                        rules.valid_statuses.join(", ")
                    )),
                );
            }
        }

        if let Some(priority) = document.priority().filter(|p| !p.trim().is_empty()) {
            if !catalog::is_valid_priority(priority) {
                findings.push(
                    Finding::error(
                        FindingCategory::InvalidPriority,
                        Severity::Medium,
                        "priority",
                        format!("Invalid priority '{}'", priority),
                    )
                    .with_actual(priority)
                    .with_suggestion(format!(
                        "Use one of: {}",
                        catalog::VALID_PRIORITIES.join(", ")
                    )),
                );
            }
        }

        debug!(
            document_id = ?document.id(),
            findings = findings.len(),
            "Structural validation complete"
        );

        Ok(findings)
    }
}

/// Required-field check shared with nested requirement records
///
/// `path_prefix` is prepended to field names (e.g.
/// `functionalRequirements[2].`).
pub(crate) fn check_required_fields<'a, F>(
    lookup: F,
    required_fields: &[&str],
    path_prefix: &str,
) -> Vec<Finding>
where
    F: Fn(&str) -> Option<&'a str>,
{
    required_fields
        .iter()
        .copied()
        .filter(|field| !is_present(lookup(*field)))
        .map(|field| {
            let path = format!("{}{}", path_prefix, field);
            Finding::error(
                FindingCategory::MissingRequiredField,
                Severity::High,
                path.clone(),
                format!("Missing required field: {}", path),
            )
            .with_suggestion(format!("Provide a value for '{}'", field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capability, Enabler};

    fn valid_capability() -> Capability {
        Capability {
            id: Some("CAP-0001".to_string()),
            title: Some("User Management".to_string()),
            description: Some("Manage user accounts and roles across the platform".to_string()),
            status: Some("Draft".to_string()),
            priority: Some("High".to_string()),
            owner: Some("Platform Team".to_string()),
            ..Default::default()
        }
    }

    fn run(doc: impl Into<Document>) -> Vec<Finding> {
        StructuralValidator::new().check(&doc.into(), None).unwrap()
    }

    #[test]
    fn test_valid_capability_has_no_findings() {
        assert!(run(valid_capability()).is_empty());
    }

    #[test]
    fn test_missing_title_reports_one_error() {
        let findings = run(Capability {
            title: None,
            ..valid_capability()
        });

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, FindingCategory::MissingRequiredField);
        assert_eq!(findings[0].field, "title");
        assert_eq!(findings[0].severity, Severity::High);
        assert!(findings[0].is_error());
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let findings = run(Capability {
            owner: Some("   ".to_string()),
            ..valid_capability()
        });
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "owner");
    }

    #[test]
    fn test_enabler_requires_capability_id() {
        let findings = run(Enabler {
            id: Some("ENB-0001".to_string()),
            title: Some("Login".to_string()),
            description: Some("Authenticate users with SSO".to_string()),
            status: Some("Draft".to_string()),
            priority: Some("High".to_string()),
            owner: Some("Team".to_string()),
            ..Default::default()
        });
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "capabilityId");
    }

    #[test]
    fn test_bad_id_status_priority() {
        let findings = run(Capability {
            id: Some("CAPABILITY-1".to_string()),
            status: Some("Done".to_string()),
            priority: Some("Urgent".to_string()),
            ..valid_capability()
        });

        let categories: Vec<_> = findings.iter().map(|f| f.category).collect();
        assert_eq!(
            categories,
            vec![
                FindingCategory::InvalidIdFormat,
                FindingCategory::InvalidStatus,
                FindingCategory::InvalidPriority,
            ]
        );
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].actual.as_deref(), Some("CAPABILITY-1"));
        assert_eq!(findings[1].severity, Severity::Medium);
        assert_eq!(findings[2].severity, Severity::Medium);
    }

    #[test]
    fn test_missing_id_is_not_also_a_format_error() {
        let findings = run(Capability {
            id: None,
            ..valid_capability()
        });
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].category, FindingCategory::MissingRequiredField);
    }

    #[test]
    fn test_nested_paths() {
        let findings = check_required_fields(|_| None, &["id", "requirement"], "functionalRequirements[2].");
        assert_eq!(findings[0].field, "functionalRequirements[2].id");
        assert_eq!(findings[1].field, "functionalRequirements[2].requirement");
    }
}
