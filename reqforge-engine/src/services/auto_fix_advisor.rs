//! Auto-fix suggestions
//!
//! Proposes mechanical fixes for well-understood finding categories. The
//! advice is never applied: documents are read-only to the engine.
//!
//! | Category | Fix | Confidence |
//! |----------|-----|------------|
//! | MISSING_REQUIRED_FIELD | default value for the field, or a generated id | 0.3 - 0.95 |
//! | INVALID_ID_FORMAT | id rebuilt from the digits of the bad id, else the next free number | 0.9 / 0.7 |
//! | INVALID_STATUS, INVALID_PRIORITY | vocabulary entry matching case-insensitively | 0.95 |
//!
//! Generated ids use the kind's prefix and the next number not already used
//! in the corpus, the results, or earlier suggestions of the same call,
//! formatted `PREFIX-####`.

use crate::catalog::{rules_for, VALID_PRIORITIES};
use crate::models::{CorpusContext, Document, DocumentKind};
use crate::types::{Finding, FindingCategory, ValidationResult};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One proposed fix
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixSuggestion {
    pub document_id: Option<String>,
    /// Field path the fix applies to
    pub field: String,
    /// Category of the finding being fixed
    pub category: FindingCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    pub suggested_value: String,
    pub description: String,
    /// 0.0 - 1.0
    pub confidence: f32,
}

/// Propose fixes for the findings in `results`
///
/// Output follows result order, then finding order within each result.
pub fn generate_auto_fix_suggestions(
    results: &[ValidationResult],
    corpus: Option<&CorpusContext>,
) -> Vec<AutoFixSuggestion> {
    let mut ids = IdAllocator::new(results, corpus);
    let mut suggestions = Vec::new();

    for result in results {
        for finding in &result.findings {
            let fix = match finding.category {
                FindingCategory::MissingRequiredField => missing_field_fix(result, finding, &mut ids),
                FindingCategory::InvalidIdFormat => id_format_fix(result, finding, &mut ids),
                FindingCategory::InvalidStatus => {
                    let statuses = rules_for(record_kind(result.kind, &finding.field)).valid_statuses;
                    vocabulary_fix(result, finding, statuses)
                }
                FindingCategory::InvalidPriority => vocabulary_fix(result, finding, VALID_PRIORITIES),
                _ => None,
            };
            suggestions.extend(fix);
        }
    }

    debug!(
        results = results.len(),
        suggestions = suggestions.len(),
        "Auto-fix suggestions generated"
    );

    suggestions
}

fn suggestion(
    result: &ValidationResult,
    finding: &Finding,
    suggested_value: String,
    description: String,
    confidence: f32,
) -> AutoFixSuggestion {
    AutoFixSuggestion {
        document_id: result.document_id.clone(),
        field: finding.field.clone(),
        category: finding.category,
        current_value: finding.actual.clone(),
        suggested_value,
        description,
        confidence,
    }
}

fn missing_field_fix(
    result: &ValidationResult,
    finding: &Finding,
    ids: &mut IdAllocator,
) -> Option<AutoFixSuggestion> {
    let kind = record_kind(result.kind, &finding.field);
    let field = leaf_field(&finding.field);

    let (value, confidence) = match field {
        "id" => (ids.next_free(rules_for(kind).id_prefix), 0.95),
        "status" => ("Draft".to_string(), 0.9),
        "priority" => ("Medium".to_string(), 0.8),
        "owner" => ("Unassigned".to_string(), 0.6),
        "title" | "name" => (format!("Untitled {}", kind.label()), 0.5),
        "type" => ("Performance".to_string(), 0.4),
        "description" | "requirement" => (
            format!("{} description to be written", kind.label()),
            0.3,
        ),
        // A back-reference cannot be guessed
        _ => return None,
    };

    Some(suggestion(
        result,
        finding,
        value.clone(),
        format!("Set {} to '{}'", finding.field, value),
        confidence,
    ))
}

fn id_format_fix(
    result: &ValidationResult,
    finding: &Finding,
    ids: &mut IdAllocator,
) -> Option<AutoFixSuggestion> {
    let kind = record_kind(result.kind, &finding.field);
    let prefix = rules_for(kind).id_prefix;

    let salvaged = finding
        .actual
        .as_deref()
        .and_then(salvage_number)
        .map(|number| format_id(prefix, number))
        .filter(|candidate| ids.reserve(candidate));

    let (value, confidence, description) = match salvaged {
        Some(value) => {
            let description = format!("Reformat id as '{}'", value);
            (value, 0.9, description)
        }
        None => {
            let value = ids.next_free(prefix);
            let description = format!("Replace id with next free identifier '{}'", value);
            (value, 0.7, description)
        }
    };

    Some(suggestion(result, finding, value, description, confidence))
}

fn vocabulary_fix(
    result: &ValidationResult,
    finding: &Finding,
    vocabulary: &[&str],
) -> Option<AutoFixSuggestion> {
    let actual = finding.actual.as_deref()?.trim();
    let normalized = vocabulary
        .iter()
        .find(|entry| entry.eq_ignore_ascii_case(actual))?;

    Some(suggestion(
        result,
        finding,
        normalized.to_string(),
        format!("Normalize '{}' to '{}'", actual, normalized),
        0.95,
    ))
}

/// Kind of the record a field path points into
fn record_kind(document_kind: DocumentKind, field: &str) -> DocumentKind {
    if field.starts_with("functionalRequirements[") {
        DocumentKind::FunctionalRequirement
    } else if field.starts_with("nonFunctionalRequirements[") {
        DocumentKind::NonFunctionalRequirement
    } else {
        document_kind
    }
}

fn leaf_field(field: &str) -> &str {
    field.rsplit('.').next().unwrap_or(field)
}

/// Number formed by the digits of a malformed id, if it fits the pattern
fn salvage_number(id: &str) -> Option<u64> {
    let digits: String = id.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let number: u64 = digits.parse().ok()?;
    (1..=999_999).contains(&number).then_some(number)
}

fn format_id(prefix: &str, number: u64) -> String {
    format!("{}-{:04}", prefix, number)
}

/// Hands out ids unused anywhere in the call's inputs
struct IdAllocator {
    used: HashSet<String>,
    next: HashMap<&'static str, u64>,
}

impl IdAllocator {
    fn new(results: &[ValidationResult], corpus: Option<&CorpusContext>) -> Self {
        let mut used: HashSet<String> = results
            .iter()
            .filter_map(|r| r.document_id.clone())
            .collect();

        if let Some(corpus) = corpus {
            for document in corpus.documents() {
                used.extend(document.key().map(str::to_string));
                if let Document::Enabler(enabler) = document {
                    let nested = enabler
                        .functional_requirements
                        .iter()
                        .filter_map(|r| r.id.as_deref())
                        .chain(
                            enabler
                                .non_functional_requirements
                                .iter()
                                .filter_map(|r| r.id.as_deref()),
                        );
                    used.extend(nested.map(|id| id.trim().to_string()));
                }
            }
        }

        Self {
            used,
            next: HashMap::new(),
        }
    }

    /// Claim `id`; false when it is already taken
    fn reserve(&mut self, id: &str) -> bool {
        self.used.insert(id.to_string())
    }

    fn next_free(&mut self, prefix: &'static str) -> String {
        let start = match self.next.get(prefix) {
            Some(&next) => next,
            None => self.highest_used(prefix) + 1,
        };

        let mut number = start;
        loop {
            let candidate = format_id(prefix, number);
            if self.reserve(&candidate) {
                self.next.insert(prefix, number + 1);
                return candidate;
            }
            number += 1;
        }
    }

    fn highest_used(&self, prefix: &str) -> u64 {
        let dash = format!("{}-", prefix);
        self.used
            .iter()
            .filter_map(|id| id.strip_prefix(&dash))
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .filter_map(|digits| digits.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
    }
}
