//! Data models for reqforge-engine
//!
//! Documents are read-only inputs; the corpus context bundles them for
//! cross-document checks.

pub mod corpus;
pub mod document;

pub use corpus::CorpusContext;
pub use document::{
    is_present, normalize_id, Capability, Document, DocumentKind, Enabler, FunctionalRequirement,
    NonFunctionalRequirement,
};
