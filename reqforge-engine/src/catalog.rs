//! Rule Catalog
//!
//! Static, read-only rule tables keyed by document kind: required fields,
//! identifier patterns, status vocabularies, the shared priority vocabulary
//! and the quality-gate constants used by the validators.
//!
//! Field names are the serialized (camelCase) names, so they double as the
//! `field` path of a finding.

use crate::models::DocumentKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// Priority vocabulary shared by every kind
pub const VALID_PRIORITIES: &[&str] = &["Critical", "High", "Medium", "Low"];

/// Approval value that unlocks implementation-class statuses
pub const APPROVED: &str = "Approved";

/// Statuses that require prior approval
pub const IMPLEMENTATION_STATUSES: &[&str] = &["In Implementation", "Implemented", "Deployed"];

const DOCUMENT_STATUSES: &[&str] = &[
    "Draft",
    "Ready for Analysis",
    "In Analysis",
    "Ready for Design",
    "In Design",
    "Ready for Implementation",
    "In Implementation",
    "Implemented",
    "Ready for Deployment",
    "Deployed",
    "Deprecated",
];

const REQUIREMENT_STATUSES: &[&str] = &[
    "Draft",
    "In Draft",
    "Ready for Design",
    "In Design",
    "Ready for Implementation",
    "In Implementation",
    "Implemented",
    "Verified",
    "Deprecated",
];

/// Modal / testability keywords expected in a functional requirement
pub const TESTABILITY_KEYWORDS: &[&str] = &["shall", "must", "will", "should", "when", "then", "given"];

/// NFR types exempt from the measurable-criteria heuristic
pub const MEASURABILITY_EXEMPT_TYPES: &[&str] = &["Security"];

/// Quality-gate constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityGates {
    /// Shorter descriptions get a medium-severity warning
    pub min_description_length: usize,
    /// Longer descriptions get a low-severity warning
    pub max_description_length: usize,
    /// Tokens marking unfinished content
    pub placeholder_tokens: &'static [&'static str],
    /// Implementation-class statuses need `approval = Approved`
    pub requires_approval_for_implementation: bool,
    /// NFR text must carry a measurable token
    pub nfr_requires_measurable_criteria: bool,
    /// Description length above which the score gets a bonus
    pub score_bonus_description_length: usize,
}

pub const QUALITY_GATES: QualityGates = QualityGates {
    min_description_length: 20,
    max_description_length: 5_000,
    placeholder_tokens: &["TBD", "TODO", "FIXME", "XXX", "[placeholder]"],
    requires_approval_for_implementation: true,
    nfr_requires_measurable_criteria: true,
    score_bonus_description_length: 100,
};

/// One catalog row
#[derive(Debug)]
pub struct KindRules {
    pub kind: DocumentKind,
    pub required_fields: &'static [&'static str],
    /// Prefix used when generating conforming ids ("CAP", "ENB", ...)
    pub id_prefix: &'static str,
    pub id_pattern: Regex,
    pub valid_statuses: &'static [&'static str],
    /// Whether the approval gate applies to this kind
    pub carries_approval: bool,
}

impl KindRules {
    pub fn is_valid_status(&self, status: &str) -> bool {
        self.valid_statuses.contains(&status)
    }

    pub fn matches_id(&self, id: &str) -> bool {
        self.id_pattern.is_match(id)
    }

    /// Human-readable pattern description for messages
    pub fn id_format(&self) -> String {
        format!("{}-#### (3-6 digits)", self.id_prefix)
    }
}

fn id_regex(prefix: &str) -> Regex {
    // Pattern is a compile-time constant shape; failure here is a programming error.
    Regex::new(&format!(r"^{}-\d{{3,6}}$", prefix)).unwrap_or_else(|e| {
        panic!("invalid built-in id pattern for {}: {}", prefix, e)
    })
}

static CAPABILITY_RULES: Lazy<KindRules> = Lazy::new(|| KindRules {
    kind: DocumentKind::Capability,
    required_fields: &["id", "title", "description", "status", "priority", "owner"],
    id_prefix: "CAP",
    id_pattern: id_regex("CAP"),
    valid_statuses: DOCUMENT_STATUSES,
    carries_approval: true,
});

static ENABLER_RULES: Lazy<KindRules> = Lazy::new(|| KindRules {
    kind: DocumentKind::Enabler,
    required_fields: &[
        "id",
        "title",
        "description",
        "status",
        "priority",
        "owner",
        "capabilityId",
    ],
    id_prefix: "ENB",
    id_pattern: id_regex("ENB"),
    valid_statuses: DOCUMENT_STATUSES,
    carries_approval: true,
});

static FUNCTIONAL_RULES: Lazy<KindRules> = Lazy::new(|| KindRules {
    kind: DocumentKind::FunctionalRequirement,
    required_fields: &["id", "name", "requirement", "priority", "status"],
    id_prefix: "FR",
    id_pattern: id_regex("FR"),
    valid_statuses: REQUIREMENT_STATUSES,
    carries_approval: false,
});

static NON_FUNCTIONAL_RULES: Lazy<KindRules> = Lazy::new(|| KindRules {
    kind: DocumentKind::NonFunctionalRequirement,
    required_fields: &["id", "name", "type", "requirement", "priority", "status"],
    id_prefix: "NFR",
    id_pattern: id_regex("NFR"),
    valid_statuses: REQUIREMENT_STATUSES,
    carries_approval: false,
});

/// Catalog row for a document kind
pub fn rules_for(kind: DocumentKind) -> &'static KindRules {
    match kind {
        DocumentKind::Capability => &CAPABILITY_RULES,
        DocumentKind::Enabler => &ENABLER_RULES,
        DocumentKind::FunctionalRequirement => &FUNCTIONAL_RULES,
        DocumentKind::NonFunctionalRequirement => &NON_FUNCTIONAL_RULES,
    }
}

pub fn is_valid_priority(priority: &str) -> bool {
    VALID_PRIORITIES.contains(&priority)
}

pub fn is_implementation_status(status: &str) -> bool {
    IMPLEMENTATION_STATUSES.contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_per_kind() {
        assert_eq!(
            rules_for(DocumentKind::Capability).required_fields,
            &["id", "title", "description", "status", "priority", "owner"]
        );
        assert!(rules_for(DocumentKind::Enabler)
            .required_fields
            .contains(&"capabilityId"));
        assert!(!rules_for(DocumentKind::Capability)
            .required_fields
            .contains(&"capabilityId"));
        assert!(rules_for(DocumentKind::NonFunctionalRequirement)
            .required_fields
            .contains(&"type"));
    }

    #[test]
    fn test_id_patterns() {
        let cap = rules_for(DocumentKind::Capability);
        assert!(cap.matches_id("CAP-001"));
        assert!(cap.matches_id("CAP-0001"));
        assert!(cap.matches_id("CAP-123456"));
        assert!(!cap.matches_id("CAP-01"));
        assert!(!cap.matches_id("cap-0001"));
        assert!(!cap.matches_id("ENB-0001"));
        assert!(!cap.matches_id("CAP-0001x"));

        assert!(rules_for(DocumentKind::Enabler).matches_id("ENB-0042"));
        assert!(rules_for(DocumentKind::FunctionalRequirement).matches_id("FR-100"));
        assert!(rules_for(DocumentKind::NonFunctionalRequirement).matches_id("NFR-0007"));
        assert!(!rules_for(DocumentKind::FunctionalRequirement).matches_id("NFR-0007"));
    }

    #[test]
    fn test_status_vocabularies() {
        let enabler = rules_for(DocumentKind::Enabler);
        assert!(enabler.is_valid_status("Draft"));
        assert!(enabler.is_valid_status("Implemented"));
        assert!(!enabler.is_valid_status("Verified"));
        assert!(!enabler.is_valid_status("draft"));

        let fr = rules_for(DocumentKind::FunctionalRequirement);
        assert!(fr.is_valid_status("Verified"));
    }

    #[test]
    fn test_priorities_and_gates() {
        assert_eq!(VALID_PRIORITIES, &["Critical", "High", "Medium", "Low"]);
        assert!(is_valid_priority("High"));
        assert!(!is_valid_priority("Urgent"));

        assert!(is_implementation_status("Deployed"));
        assert!(!is_implementation_status("Ready for Implementation"));

        assert!(QUALITY_GATES.min_description_length < QUALITY_GATES.max_description_length);
        assert!(QUALITY_GATES.placeholder_tokens.contains(&"TBD"));
        assert!(QUALITY_GATES.placeholder_tokens.contains(&"TODO"));
        assert!(QUALITY_GATES.requires_approval_for_implementation);
        assert!(QUALITY_GATES.nfr_requires_measurable_criteria);
    }

    #[test]
    fn test_approval_applies_to_top_level_kinds_only() {
        assert!(rules_for(DocumentKind::Capability).carries_approval);
        assert!(rules_for(DocumentKind::Enabler).carries_approval);
        assert!(!rules_for(DocumentKind::FunctionalRequirement).carries_approval);
    }
}
