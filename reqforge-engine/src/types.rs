//! Core Types and Trait Definitions for reqforge-engine
//!
//! Defines the validation vocabulary shared by every component:
//! - **Finding**: one error / warning / suggestion attached to a field
//! - **ValidationResult**: one document's aggregated outcome
//! - **RuleChecker**: the seam every rule family implements
//!
//! # Architecture
//! Validation of one document runs five rule checkers (structural, content,
//! relationships, quality gates, business logic). Each produces findings;
//! the orchestrator aggregates them in declaration order and scores them.

use crate::models::{CorpusContext, Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Findings
// ============================================================================

/// Finding kind (tagged variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// Makes the document invalid
    Error,
    /// Quality problem, document stays valid
    Warning,
    /// Improvement hint
    Suggestion,
}

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Finding category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum FindingCategory {
    MissingRequiredField,
    InvalidIdFormat,
    InvalidStatus,
    InvalidPriority,
    DescriptionTooShort,
    DescriptionTooLong,
    PlaceholderContent,
    NonTestableRequirement,
    NonMeasurableRequirement,
    InvalidCapabilityReference,
    DuplicateId,
    UnresolvedDependency,
    CircularDependency,
    MissingApprovalForImplementation,
    MissingNonFunctionalRequirements,
    MissingFunctionalRequirements,
    DecompositionSuggested,
    MissingImplementationPlan,
    MissingAcceptanceCriteria,
    /// Internal checker failure converted to a finding
    ValidationError,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            FindingCategory::InvalidIdFormat => "INVALID_ID_FORMAT",
            FindingCategory::InvalidStatus => "INVALID_STATUS",
            FindingCategory::InvalidPriority => "INVALID_PRIORITY",
            FindingCategory::DescriptionTooShort => "DESCRIPTION_TOO_SHORT",
            FindingCategory::DescriptionTooLong => "DESCRIPTION_TOO_LONG",
            FindingCategory::PlaceholderContent => "PLACEHOLDER_CONTENT",
            FindingCategory::NonTestableRequirement => "NON_TESTABLE_REQUIREMENT",
            FindingCategory::NonMeasurableRequirement => "NON_MEASURABLE_REQUIREMENT",
            FindingCategory::InvalidCapabilityReference => "INVALID_CAPABILITY_REFERENCE",
            FindingCategory::DuplicateId => "DUPLICATE_ID",
            FindingCategory::UnresolvedDependency => "UNRESOLVED_DEPENDENCY",
            FindingCategory::CircularDependency => "CIRCULAR_DEPENDENCY",
            FindingCategory::MissingApprovalForImplementation => {
                "MISSING_APPROVAL_FOR_IMPLEMENTATION"
            }
            FindingCategory::MissingNonFunctionalRequirements => {
                "MISSING_NON_FUNCTIONAL_REQUIREMENTS"
            }
            FindingCategory::MissingFunctionalRequirements => "MISSING_FUNCTIONAL_REQUIREMENTS",
            FindingCategory::DecompositionSuggested => "DECOMPOSITION_SUGGESTED",
            FindingCategory::MissingImplementationPlan => "MISSING_IMPLEMENTATION_PLAN",
            FindingCategory::MissingAcceptanceCriteria => "MISSING_ACCEPTANCE_CRITERIA",
            FindingCategory::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub kind: FindingKind,
    pub category: FindingCategory,
    pub message: String,
    pub severity: Severity,
    /// Dotted path into the document, e.g. `functionalRequirements[2].requirement`
    pub field: String,
    /// Remediation hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Offending value, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Cycle path for circular dependencies (first id repeated at the end)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_path: Option<Vec<String>>,
}

impl Finding {
    fn new(
        kind: FindingKind,
        category: FindingCategory,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            message: message.into(),
            severity,
            field: field.into(),
            suggestion: None,
            actual: None,
            cycle_path: None,
        }
    }

    /// Create new error finding
    pub fn error(
        category: FindingCategory,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(FindingKind::Error, category, severity, field, message)
    }

    /// Create new warning finding
    pub fn warning(
        category: FindingCategory,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(FindingKind::Warning, category, severity, field, message)
    }

    /// Create new suggestion finding
    pub fn suggestion(
        category: FindingCategory,
        severity: Severity,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(FindingKind::Suggestion, category, severity, field, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn with_cycle_path(mut self, path: Vec<String>) -> Self {
        self.cycle_path = Some(path);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == FindingKind::Error
    }
}

// ============================================================================
// Validation Result
// ============================================================================

/// One document's validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Document id as supplied (None when absent or blank)
    pub document_id: Option<String>,
    pub kind: DocumentKind,
    /// True iff no error-kind findings
    pub is_valid: bool,
    /// All findings in checker declaration order
    pub findings: Vec<Finding>,
    /// Quality score (0-100)
    pub quality_score: u8,
    #[serde(rename = "processingTimeMillis")]
    pub processing_time_ms: u64,
    pub from_cache: bool,
    pub validated_at: DateTime<Utc>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.of_kind(FindingKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.of_kind(FindingKind::Warning)
    }

    pub fn suggestions(&self) -> impl Iterator<Item = &Finding> {
        self.of_kind(FindingKind::Suggestion)
    }

    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }

    /// Count findings by kind
    pub fn count(&self, kind: FindingKind) -> usize {
        self.of_kind(kind).count()
    }

    pub fn has_category(&self, category: FindingCategory) -> bool {
        self.findings.iter().any(|f| f.category == category)
    }
}

// ============================================================================
// Rule Checker Trait
// ============================================================================

/// Validation phase, in aggregation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPhase {
    Structure,
    Content,
    Relationships,
    QualityGates,
    BusinessLogic,
}

impl ValidationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationPhase::Structure => "structure",
            ValidationPhase::Content => "content",
            ValidationPhase::Relationships => "relationships",
            ValidationPhase::QualityGates => "quality_gates",
            ValidationPhase::BusinessLogic => "business_logic",
        }
    }
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule checker trait
///
/// Checkers are pure: no shared mutable state, safe to run concurrently
/// against the same document. Expected data-quality problems are findings;
/// `Err` is reserved for conditions the checker cannot handle.
///
/// # Example
/// ```rust,ignore
/// struct OwnerChecker;
///
/// impl RuleChecker for OwnerChecker {
///     fn phase(&self) -> ValidationPhase { ValidationPhase::BusinessLogic }
///
///     fn check(&self, doc: &Document, _corpus: Option<&CorpusContext>)
///         -> Result<Vec<Finding>, CheckError>
///     {
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait RuleChecker: Send + Sync {
    /// Phase this checker implements
    fn phase(&self) -> ValidationPhase;

    /// Inspect a document, optionally against its corpus
    fn check(
        &self,
        document: &Document,
        corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError>;
}

/// Unexpected checker failure
#[derive(Debug, Error)]
pub enum CheckError {
    /// Document shape violates an assumption the checker relies on
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Internal processing error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(findings: Vec<Finding>) -> ValidationResult {
        ValidationResult {
            document_id: Some("CAP-0001".to_string()),
            kind: DocumentKind::Capability,
            is_valid: !findings.iter().any(Finding::is_error),
            findings,
            quality_score: 100,
            processing_time_ms: 0,
            from_cache: false,
            validated_at: Utc::now(),
        }
    }

    #[test]
    fn test_filtered_views() {
        let result = result_with(vec![
            Finding::error(FindingCategory::InvalidStatus, Severity::Medium, "status", "bad"),
            Finding::warning(
                FindingCategory::PlaceholderContent,
                Severity::Medium,
                "description",
                "TBD",
            ),
            Finding::suggestion(
                FindingCategory::DecompositionSuggested,
                Severity::Low,
                "enablers",
                "split",
            ),
            Finding::warning(
                FindingCategory::DescriptionTooShort,
                Severity::Medium,
                "description",
                "short",
            ),
        ]);

        assert_eq!(result.errors().count(), 1);
        assert_eq!(result.count(FindingKind::Warning), 2);
        assert_eq!(result.suggestions().count(), 1);
        assert!(!result.is_valid);
        assert!(result.has_category(FindingCategory::PlaceholderContent));
    }

    #[test]
    fn test_category_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&FindingCategory::MissingApprovalForImplementation).unwrap();
        assert_eq!(json, "\"MISSING_APPROVAL_FOR_IMPLEMENTATION\"");
        assert_eq!(
            FindingCategory::MissingApprovalForImplementation.as_str(),
            "MISSING_APPROVAL_FOR_IMPLEMENTATION"
        );
    }

    #[test]
    fn test_finding_json_omits_empty_extras() {
        let finding = Finding::error(
            FindingCategory::MissingRequiredField,
            Severity::High,
            "title",
            "Missing required field: title",
        );
        let value = serde_json::to_value(&finding).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(value["severity"], "high");
        assert!(value.get("cyclePath").is_none());
        assert!(value.get("actual").is_none());
    }
}
