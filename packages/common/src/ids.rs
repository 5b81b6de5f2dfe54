//! Identifiers for sections and their owning documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Globally unique section identifier (never reused)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of a saved case study document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The document a session edits: either saved remotely or a new draft
///
/// Drafts have no id yet, so their sections stay local (and in the session
/// cache) until the document collaborator saves the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentRef {
    Saved(DocumentId),
    Unsaved,
}

impl DocumentRef {
    pub fn id(&self) -> Option<&DocumentId> {
        match self {
            DocumentRef::Saved(id) => Some(id),
            DocumentRef::Unsaved => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, DocumentRef::Saved(_))
    }
}

impl From<DocumentId> for DocumentRef {
    fn from(id: DocumentId) -> Self {
        DocumentRef::Saved(id)
    }
}

impl From<Option<DocumentId>> for DocumentRef {
    fn from(id: Option<DocumentId>) -> Self {
        match id {
            Some(id) => DocumentRef::Saved(id),
            None => DocumentRef::Unsaved,
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentRef::Saved(id) => write!(f, "{}", id),
            DocumentRef::Unsaved => f.write_str("<unsaved>"),
        }
    }
}
