//! Corpus context for cross-document checks

use super::document::{Document, DocumentKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only set of documents available for cross-document checks
///
/// Cloning is cheap (shared map), so a context can be handed to every
/// validation of a batch.
#[derive(Debug, Clone, Default)]
pub struct CorpusContext {
    documents: Arc<HashMap<String, Document>>,
    occurrences: Arc<HashMap<String, usize>>,
}

impl CorpusContext {
    /// Build a context keyed by document id
    ///
    /// Documents without a usable id cannot be referenced and are skipped.
    /// On duplicate ids the last document wins for lookups; every copy is
    /// still counted in `occurrences`.
    pub fn new<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        let mut map = HashMap::new();
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        for document in documents {
            if let Some(key) = document.key() {
                *occurrences.entry(key.to_string()).or_default() += 1;
                map.insert(key.to_string(), document);
            }
        }
        Self {
            documents: Arc::new(map),
            occurrences: Arc::new(occurrences),
        }
    }

    /// How many supplied documents carry `id`
    pub fn occurrences(&self, id: &str) -> usize {
        self.occurrences.get(id).copied().unwrap_or(0)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// True when `id` names a capability in this corpus
    pub fn has_capability(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|doc| doc.kind() == DocumentKind::Capability)
    }

    /// Dependency list of `id`, or `None` when the id is unknown
    pub fn dependencies_of(&self, id: &str) -> Option<&[String]> {
        self.get(id).map(Document::dependencies)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for CorpusContext {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::new(iter)
    }
}
