//! Type-specific section payloads.
//!
//! The sync engine moves payloads around and compares them, but never looks
//! inside. Adding a section kind means adding a variant here, and the
//! compiler then points at every `match` that needs a new arm.

use crate::section::SectionKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentItem {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub heading: String,
    pub body: String,
}

/// Structured data whose shape depends on the section kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SectionPayload {
    Introduction {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
    },

    Alignment {
        #[serde(default)]
        items: Vec<AlignmentItem>,
    },

    Carousel {
        #[serde(default)]
        items: Vec<CarouselItem>,
    },

    FourParagraphs {
        #[serde(default)]
        paragraphs: Vec<Paragraph>,
    },
}

impl SectionPayload {
    /// Payload a freshly added section of `kind` starts with
    pub fn default_for(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Introduction => SectionPayload::Introduction { subtitle: None },
            SectionKind::Alignment => SectionPayload::Alignment { items: Vec::new() },
            SectionKind::Carousel => SectionPayload::Carousel { items: Vec::new() },
            SectionKind::FourParagraphs => SectionPayload::FourParagraphs {
                paragraphs: vec![Paragraph::default(); 4],
            },
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            SectionPayload::Introduction { .. } => SectionKind::Introduction,
            SectionPayload::Alignment { .. } => SectionKind::Alignment,
            SectionPayload::Carousel { .. } => SectionKind::Carousel,
            SectionPayload::FourParagraphs { .. } => SectionKind::FourParagraphs,
        }
    }
}
