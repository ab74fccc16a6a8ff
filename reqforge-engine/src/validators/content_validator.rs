//! Content Validator
//!
//! Checks the prose of a document.
//!
//! # Checks
//! 1. **Description length**: within the quality-gate window
//!    (too short: warning, medium; too long: warning, low)
//! 2. **Placeholder tokens**: TBD / TODO / ... in title or description
//!    (warning, medium)
//! 3. **Nested requirement records** (enablers): each functional and
//!    non-functional record gets the required-field check plus the
//!    requirement heuristics below
//! 4. **Requirement heuristics**:
//!    - functional: must contain a modal/testability keyword
//!    - non-functional: must contain a measurable token (number, `%`, time
//!      unit, comparison operator) unless its type is exempt (Security)
//!
//! A requirement record validated on its own gets the heuristics directly.

use crate::catalog::{
    rules_for, MEASURABILITY_EXEMPT_TYPES, QUALITY_GATES, TESTABILITY_KEYWORDS,
};
use crate::models::{
    CorpusContext, Document, DocumentKind, FunctionalRequirement, NonFunctionalRequirement,
};
use crate::types::{CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase};
use crate::validators::structural_validator::check_required_fields;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static MEASURABLE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\d|%|[<>≤≥]|\b(ms|msec|milliseconds?|secs?|seconds?|mins?|minutes?|hrs?|hours?|days?|weeks?)\b",
    )
    .unwrap_or_else(|e| panic!("invalid measurable-token pattern: {}", e))
});

/// Content Validator
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentValidator;

impl ContentValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_description(&self, description: Option<&str>, findings: &mut Vec<Finding>) {
        let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
            return;
        };

        let length = description.trim().chars().count();
        if length < QUALITY_GATES.min_description_length {
            findings.push(
                Finding::warning(
                    FindingCategory::DescriptionTooShort,
                    Severity::Medium,
                    "description",
                    format!(
                        "Description is too short ({} characters, minimum {})",
                        length, QUALITY_GATES.min_description_length
                    ),
                )
                .with_suggestion("Expand the description with scope, context and intent"),
            );
        } else if length > QUALITY_GATES.max_description_length {
            findings.push(
                Finding::warning(
                    FindingCategory::DescriptionTooLong,
                    Severity::Low,
                    "description",
                    format!(
                        "Description is too long ({} characters, maximum {})",
                        length, QUALITY_GATES.max_description_length
                    ),
                )
                .with_suggestion("Move detail into enablers or requirement records"),
            );
        }
    }

    fn check_placeholders(&self, field: &str, text: Option<&str>, findings: &mut Vec<Finding>) {
        let Some(text) = text else {
            return;
        };

        let found = placeholder_tokens_in(text);
        if !found.is_empty() {
            findings.push(
                Finding::warning(
                    FindingCategory::PlaceholderContent,
                    Severity::Medium,
                    field,
                    format!("Placeholder content found in {}: {}", field, found.join(", ")),
                )
                .with_suggestion("Replace placeholder text with final content"),
            );
        }
    }

    fn check_functional(
        &self,
        record: &FunctionalRequirement,
        path_prefix: &str,
        findings: &mut Vec<Finding>,
    ) {
        let Some(text) = record.requirement.as_deref().filter(|t| !t.trim().is_empty()) else {
            return;
        };

        if !is_testable(text) {
            findings.push(
                Finding::warning(
                    FindingCategory::NonTestableRequirement,
                    Severity::Medium,
                    format!("{}requirement", path_prefix),
                    "Functional requirement has no testable wording (shall, must, will, should, when, then, given)",
                )
                .with_suggestion("Rephrase as 'The system shall ...' or a Given/When/Then statement"),
            );
        }
    }

    fn check_non_functional(
        &self,
        record: &NonFunctionalRequirement,
        path_prefix: &str,
        findings: &mut Vec<Finding>,
    ) {
        if !QUALITY_GATES.nfr_requires_measurable_criteria {
            return;
        }
        let Some(text) = record.requirement.as_deref().filter(|t| !t.trim().is_empty()) else {
            return;
        };

        let exempt = record
            .requirement_type
            .as_deref()
            .is_some_and(|t| MEASURABILITY_EXEMPT_TYPES.contains(&t.trim()));

        if !exempt && !is_measurable(text) {
            findings.push(
                Finding::warning(
                    FindingCategory::NonMeasurableRequirement,
                    Severity::Medium,
                    format!("{}requirement", path_prefix),
                    "Non-functional requirement has no measurable criteria",
                )
                .with_suggestion("Add a threshold, e.g. 'responds within 200 ms' or '99.9% uptime'"),
            );
        }
    }
}

impl RuleChecker for ContentValidator {
    fn phase(&self) -> ValidationPhase {
        ValidationPhase::Content
    }

    fn check(
        &self,
        document: &Document,
        _corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError> {
        let mut findings = Vec::new();

        match document {
            Document::Capability(_) | Document::Enabler(_) => {
                self.check_description(document.description(), &mut findings);
                self.check_placeholders("title", document.text_field("title"), &mut findings);
                self.check_placeholders("description", document.description(), &mut findings);
            }
            Document::FunctionalRequirement(record) => {
                self.check_functional(record, "", &mut findings);
            }
            Document::NonFunctionalRequirement(record) => {
                self.check_non_functional(record, "", &mut findings);
            }
        }

        if let Document::Enabler(enabler) = document {
            let fr_rules = rules_for(DocumentKind::FunctionalRequirement);
            for (index, record) in enabler.functional_requirements.iter().enumerate() {
                let prefix = format!("functionalRequirements[{}].", index);
                findings.extend(check_required_fields(
                    |name| record.text_field(name),
                    fr_rules.required_fields,
                    &prefix,
                ));
                self.check_functional(record, &prefix, &mut findings);
            }

            let nfr_rules = rules_for(DocumentKind::NonFunctionalRequirement);
            for (index, record) in enabler.non_functional_requirements.iter().enumerate() {
                let prefix = format!("nonFunctionalRequirements[{}].", index);
                findings.extend(check_required_fields(
                    |name| record.text_field(name),
                    nfr_rules.required_fields,
                    &prefix,
                ));
                self.check_non_functional(record, &prefix, &mut findings);
            }
        }

        debug!(
            document_id = ?document.id(),
            findings = findings.len(),
            "Content validation complete"
        );

        Ok(findings)
    }
}

/// Placeholder tokens present in `text`, in catalog order
///
/// Alphanumeric tokens match whole words, case-sensitively, so "todo list"
/// prose does not trip the TODO marker; bracketed tokens match as
/// case-insensitive substrings.
pub fn placeholder_tokens_in(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    QUALITY_GATES
        .placeholder_tokens
        .iter()
        .copied()
        .filter(|token| {
            if token.chars().all(char::is_alphanumeric) {
                words(text).any(|word| word == *token)
            } else {
                lowered.contains(&token.to_lowercase())
            }
        })
        .collect()
}

/// True when the text contains a modal / testability keyword
pub fn is_testable(text: &str) -> bool {
    words(text).any(|word| {
        let word = word.to_lowercase();
        TESTABILITY_KEYWORDS.contains(&word.as_str())
    })
}

/// True when the text contains a measurable token
pub fn is_measurable(text: &str) -> bool {
    MEASURABLE_TOKEN.is_match(text)
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}
