//! Relationship Validator
//!
//! Cross-document checks. Everything that needs a corpus is skipped when
//! none is supplied; the cycle check then only sees the document's own
//! edges (which still catches a self-dependency).
//!
//! # Checks
//! 1. **Duplicate id**: the corpus holds more than one document with this
//!    id (error, high)
//! 2. **Capability reference** (enablers): `capabilityId` must name a
//!    capability in the corpus (error, critical)
//! 3. **Dependency cycles**: one error per document (critical) carrying the
//!    full cycle path
//! 4. **Unresolved dependencies**: ids missing from the corpus
//!    (warning, medium)

use crate::models::{normalize_id, CorpusContext, Document};
use crate::services::dependency_graph::{detect_cycle, CycleCheck};
use crate::types::{CheckError, Finding, FindingCategory, RuleChecker, Severity, ValidationPhase};
use tracing::debug;

/// Relationship Validator
#[derive(Debug, Default, Clone, Copy)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_duplicate_id(
        &self,
        document: &Document,
        corpus: &CorpusContext,
        findings: &mut Vec<Finding>,
    ) {
        let Some(id) = document.key() else {
            return;
        };
        let copies = corpus.occurrences(id);
        if copies > 1 {
            findings.push(
                Finding::error(
                    FindingCategory::DuplicateId,
                    Severity::High,
                    "id",
                    format!("Id '{}' is used by {} documents in the corpus", id, copies),
                )
                .with_actual(id)
                .with_suggestion("Give each document a unique id"),
            );
        }
    }

    fn check_capability_reference(
        &self,
        document: &Document,
        corpus: &CorpusContext,
        findings: &mut Vec<Finding>,
    ) {
        let Document::Enabler(enabler) = document else {
            return;
        };
        let Some(capability_id) = enabler
            .capability_id
            .as_deref()
            .map(normalize_id)
            .filter(|id| !id.is_empty())
        else {
            return;
        };

        if !corpus.has_capability(capability_id) {
            findings.push(
                Finding::error(
                    FindingCategory::InvalidCapabilityReference,
                    Severity::Critical,
                    "capabilityId",
                    format!(
                        "Enabler references capability '{}' which does not exist",
                        capability_id
                    ),
                )
                .with_actual(capability_id)
                .with_suggestion("Point capabilityId at an existing capability"),
            );
        }
    }

    fn check_cycles(
        &self,
        document: &Document,
        corpus: Option<&CorpusContext>,
        findings: &mut Vec<Finding>,
    ) {
        let Some(id) = document.key() else {
            return;
        };
        if document.dependencies().is_empty() {
            return;
        }

        // The document under validation overrides any corpus copy of itself
        let check = detect_cycle(id, |node| {
            if node == id {
                Some(document.dependencies())
            } else {
                corpus.and_then(|c| c.dependencies_of(node))
            }
        });

        if let CycleCheck::Cycle { path } = check {
            findings.push(
                Finding::error(
                    FindingCategory::CircularDependency,
                    Severity::Critical,
                    "dependencies",
                    format!("Circular dependency detected: {}", path.join(" -> ")),
                )
                .with_suggestion("Remove one of the dependencies in the cycle")
                .with_cycle_path(path),
            );
        }
    }

    fn check_unresolved(
        &self,
        document: &Document,
        corpus: &CorpusContext,
        findings: &mut Vec<Finding>,
    ) {
        let own_id = document.key();
        for (index, dependency) in document.dependency_ids().enumerate() {
            if Some(dependency) == own_id || corpus.contains(dependency) {
                continue;
            }
            findings.push(
                Finding::warning(
                    FindingCategory::UnresolvedDependency,
                    Severity::Medium,
                    format!("dependencies[{}]", index),
                    format!("Dependency '{}' does not exist in the corpus", dependency),
                )
                .with_actual(dependency),
            );
        }
    }
}

impl RuleChecker for RelationshipValidator {
    fn phase(&self) -> ValidationPhase {
        ValidationPhase::Relationships
    }

    fn check(
        &self,
        document: &Document,
        corpus: Option<&CorpusContext>,
    ) -> Result<Vec<Finding>, CheckError> {
        let mut findings = Vec::new();

        if let Some(corpus) = corpus {
            self.check_duplicate_id(document, corpus, &mut findings);
            self.check_capability_reference(document, corpus, &mut findings);
        }
        self.check_cycles(document, corpus, &mut findings);
        if let Some(corpus) = corpus {
            self.check_unresolved(document, corpus, &mut findings);
        }

        debug!(
            document_id = ?document.id(),
            has_corpus = corpus.is_some(),
            findings = findings.len(),
            "Relationship validation complete"
        );

        Ok(findings)
    }
}
