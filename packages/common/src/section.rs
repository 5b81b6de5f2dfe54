//! # Sections
//!
//! A section is one content block of a case study. Its kind is fixed at
//! creation; changing the kind means deleting the section and adding a new
//! one.

use crate::error::ValidationError;
use crate::ids::{DocumentId, SectionId};
use crate::patch::SectionPatch;
use crate::payload::SectionPayload;
use crate::result::ValidationResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of section types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Introduction,
    Alignment,
    Carousel,
    FourParagraphs,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Introduction,
        SectionKind::Alignment,
        SectionKind::Carousel,
        SectionKind::FourParagraphs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Introduction => "introduction",
            SectionKind::Alignment => "alignment",
            SectionKind::Carousel => "carousel",
            SectionKind::FourParagraphs => "fourParagraphs",
        }
    }

    /// Title a freshly added section starts with
    pub fn default_title(&self) -> &'static str {
        match self {
            SectionKind::Introduction => "Introduction",
            SectionKind::Alignment => "Alignment",
            SectionKind::Carousel => "Carousel",
            SectionKind::FourParagraphs => "Four paragraphs",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown section kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown section kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for SectionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A single ordered content block belonging to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,

    /// Owning document; `None` while the document is an unsaved draft
    #[serde(default)]
    pub document_id: Option<DocumentId>,

    #[serde(rename = "type")]
    pub kind: SectionKind,

    #[serde(default)]
    pub title: String,

    /// Primary rich-text body (may stay empty for payload-only kinds)
    #[serde(default)]
    pub content: String,

    pub order: u32,

    #[serde(default)]
    pub published: bool,

    pub payload: SectionPayload,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Section {
    /// Create a section with a fresh id and the kind's default payload
    pub fn new(kind: SectionKind, document_id: Option<DocumentId>, order: u32) -> Self {
        Self::with_id(SectionId::generate(), kind, document_id, order)
    }

    pub fn with_id(
        id: SectionId,
        kind: SectionKind,
        document_id: Option<DocumentId>,
        order: u32,
    ) -> Self {
        Self {
            id,
            document_id,
            kind,
            title: kind.default_title().to_string(),
            content: String::new(),
            order,
            published: false,
            payload: SectionPayload::default_for(kind),
            image_ref: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Check the payload variant still matches the section kind
    pub fn check_shape(&self) -> ValidationResult<()> {
        let attempted = self.payload.kind();
        if attempted != self.kind {
            return Err(ValidationError::KindChange {
                section: self.id.clone(),
                kind: self.kind,
                attempted,
            });
        }
        Ok(())
    }

    /// Apply a partial update, rejecting a payload of another kind
    ///
    /// Nothing is modified when validation fails.
    pub fn apply_patch(&mut self, patch: &SectionPatch) -> ValidationResult<()> {
        if let Some(payload) = &patch.payload {
            if payload.kind() != self.kind {
                return Err(ValidationError::KindChange {
                    section: self.id.clone(),
                    kind: self.kind,
                    attempted: payload.kind(),
                });
            }
        }

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        if let Some(payload) = &patch.payload {
            self.payload = payload.clone();
        }
        if let Some(image_ref) = &patch.image_ref {
            self.image_ref = image_ref.clone();
        }
        Ok(())
    }
}
