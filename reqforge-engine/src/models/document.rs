//! Requirement document model
//!
//! One variant per document kind, each with its own fixed field set.
//! Documents are supplied by an external parser and only ever read by the
//! engine.
//!
//! Scalar text fields are `Option<String>`: an absent or blank value is a
//! data-quality problem that the validators report as a finding, so it must
//! survive deserialization. Status, priority and approval stay free strings
//! for the same reason; their vocabularies live in the rule catalog.
//!
//! # JSON shape
//! ```json
//! { "kind": "enabler", "id": "ENB-0042", "capabilityId": "CAP-0001",
//!   "functionalRequirements": [ { "id": "FR-0001", "requirement": "..." } ] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document kind discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Capability,
    Enabler,
    FunctionalRequirement,
    NonFunctionalRequirement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Capability => "capability",
            DocumentKind::Enabler => "enabler",
            DocumentKind::FunctionalRequirement => "functionalRequirement",
            DocumentKind::NonFunctionalRequirement => "nonFunctionalRequirement",
        }
    }

    /// Human-readable label used in messages ("Capability", "Enabler", ...)
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Capability => "Capability",
            DocumentKind::Enabler => "Enabler",
            DocumentKind::FunctionalRequirement => "Functional requirement",
            DocumentKind::NonFunctionalRequirement => "Non-functional requirement",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level requirement document representing a system capability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Capability {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub owner: Option<String>,
    /// "Approved" or "Not Approved"
    pub approval: Option<String>,
    /// Upstream capability ids this capability depends on
    pub dependencies: Vec<String>,
    /// Ids of enablers realizing this capability
    pub enablers: Vec<String>,
    pub implementation_plan: Option<String>,
    pub acceptance_criteria: Option<String>,
}

/// Child document under a capability, carrying requirement records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Enabler {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub owner: Option<String>,
    pub approval: Option<String>,
    /// Back-reference to the owning capability
    pub capability_id: Option<String>,
    pub dependencies: Vec<String>,
    pub functional_requirements: Vec<FunctionalRequirement>,
    pub non_functional_requirements: Vec<NonFunctionalRequirement>,
    pub implementation_plan: Option<String>,
    pub acceptance_criteria: Option<String>,
}

/// Functional requirement record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionalRequirement {
    pub id: Option<String>,
    pub name: Option<String>,
    pub requirement: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// Non-functional requirement record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NonFunctionalRequirement {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Requirement category, e.g. "Performance", "Security"
    #[serde(rename = "type")]
    pub requirement_type: Option<String>,
    pub requirement: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl FunctionalRequirement {
    /// Text field lookup by its serialized (camelCase) name
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "name" => self.name.as_deref(),
            "requirement" => self.requirement.as_deref(),
            "priority" => self.priority.as_deref(),
            "status" => self.status.as_deref(),
            _ => None,
        }
    }
}

impl NonFunctionalRequirement {
    /// Text field lookup by its serialized (camelCase) name
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "name" => self.name.as_deref(),
            "type" => self.requirement_type.as_deref(),
            "requirement" => self.requirement.as_deref(),
            "priority" => self.priority.as_deref(),
            "status" => self.status.as_deref(),
            _ => None,
        }
    }
}

/// A validatable document of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Document {
    Capability(Capability),
    Enabler(Enabler),
    FunctionalRequirement(FunctionalRequirement),
    NonFunctionalRequirement(NonFunctionalRequirement),
}

/// Canonical form of a document id used for every lookup
pub fn normalize_id(id: &str) -> &str {
    id.trim()
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Capability(_) => DocumentKind::Capability,
            Document::Enabler(_) => DocumentKind::Enabler,
            Document::FunctionalRequirement(_) => DocumentKind::FunctionalRequirement,
            Document::NonFunctionalRequirement(_) => DocumentKind::NonFunctionalRequirement,
        }
    }

    /// Raw id as supplied (may be blank)
    pub fn id(&self) -> Option<&str> {
        match self {
            Document::Capability(c) => c.id.as_deref(),
            Document::Enabler(e) => e.id.as_deref(),
            Document::FunctionalRequirement(r) => r.id.as_deref(),
            Document::NonFunctionalRequirement(r) => r.id.as_deref(),
        }
    }

    /// Trimmed, non-blank id usable as a cache key or graph node
    pub fn key(&self) -> Option<&str> {
        self.id().map(normalize_id).filter(|id| !id.is_empty())
    }

    /// Text field lookup by its serialized (camelCase) name
    ///
    /// Returns `None` both for absent values and for names the kind does
    /// not carry.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match self {
            Document::Capability(c) => match name {
                "id" => c.id.as_deref(),
                "title" => c.title.as_deref(),
                "description" => c.description.as_deref(),
                "status" => c.status.as_deref(),
                "priority" => c.priority.as_deref(),
                "owner" => c.owner.as_deref(),
                "approval" => c.approval.as_deref(),
                "implementationPlan" => c.implementation_plan.as_deref(),
                "acceptanceCriteria" => c.acceptance_criteria.as_deref(),
                _ => None,
            },
            Document::Enabler(e) => match name {
                "id" => e.id.as_deref(),
                "title" => e.title.as_deref(),
                "description" => e.description.as_deref(),
                "status" => e.status.as_deref(),
                "priority" => e.priority.as_deref(),
                "owner" => e.owner.as_deref(),
                "approval" => e.approval.as_deref(),
                "capabilityId" => e.capability_id.as_deref(),
                "implementationPlan" => e.implementation_plan.as_deref(),
                "acceptanceCriteria" => e.acceptance_criteria.as_deref(),
                _ => None,
            },
            Document::FunctionalRequirement(r) => r.text_field(name),
            Document::NonFunctionalRequirement(r) => r.text_field(name),
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.text_field("status")
    }

    pub fn priority(&self) -> Option<&str> {
        self.text_field("priority")
    }

    pub fn approval(&self) -> Option<&str> {
        self.text_field("approval")
    }

    /// Main prose field: `description` for capabilities/enablers,
    /// `requirement` for requirement records
    pub fn description(&self) -> Option<&str> {
        match self {
            Document::Capability(c) => c.description.as_deref(),
            Document::Enabler(e) => e.description.as_deref(),
            Document::FunctionalRequirement(r) => r.requirement.as_deref(),
            Document::NonFunctionalRequirement(r) => r.requirement.as_deref(),
        }
    }

    /// Dependency list as supplied; use `dependency_ids` for lookups
    pub fn dependencies(&self) -> &[String] {
        match self {
            Document::Capability(c) => &c.dependencies,
            Document::Enabler(e) => &e.dependencies,
            _ => &[],
        }
    }

    /// Dependency ids normalized the same way as `key`
    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies().iter().map(|id| normalize_id(id))
    }

    pub fn implementation_plan(&self) -> Option<&str> {
        self.text_field("implementationPlan")
    }

    pub fn acceptance_criteria(&self) -> Option<&str> {
        self.text_field("acceptanceCriteria")
    }
}

impl From<Capability> for Document {
    fn from(value: Capability) -> Self {
        Document::Capability(value)
    }
}

impl From<Enabler> for Document {
    fn from(value: Enabler) -> Self {
        Document::Enabler(value)
    }
}

impl From<FunctionalRequirement> for Document {
    fn from(value: FunctionalRequirement) -> Self {
        Document::FunctionalRequirement(value)
    }
}

impl From<NonFunctionalRequirement> for Document {
    fn from(value: NonFunctionalRequirement) -> Self {
        Document::NonFunctionalRequirement(value)
    }
}

/// True when the value is present and not just whitespace
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
