//! # Section Patches
//!
//! Partial updates sent to the remote store. A patch only carries the fields
//! that changed, so re-sending an identical update is a no-op at the store.

use crate::payload::SectionPayload;
use crate::section::Section;
use serde::{Deserialize, Deserializer, Serialize};

/// Partial update of a single section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SectionPayload>,

    /// `Some(None)` clears the image reference
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl SectionPatch {
    pub fn order(order: u32) -> Self {
        Self {
            order: Some(order),
            ..Default::default()
        }
    }

    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Default::default()
        }
    }

    /// Minimal patch turning `old` into `new`
    ///
    /// Identity and kind are not part of a patch; callers compare sections
    /// with the same id.
    pub fn between(old: &Section, new: &Section) -> Self {
        fn changed<T: PartialEq + Clone>(old: &T, new: &T) -> Option<T> {
            (old != new).then(|| new.clone())
        }

        Self {
            title: changed(&old.title, &new.title),
            content: changed(&old.content, &new.content),
            order: changed(&old.order, &new.order),
            published: changed(&old.published, &new.published),
            payload: changed(&old.payload, &new.payload),
            image_ref: changed(&old.image_ref, &new.image_ref),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.order.is_none()
            && self.published.is_none()
            && self.payload.is_none()
            && self.image_ref.is_none()
    }
}

/// Author edit of a section's body
///
/// Order and publication state change only through the section operations,
/// so an edit cannot touch them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SectionPayload>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<Option<String>>,
}

impl SectionEdit {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.payload.is_none()
            && self.image_ref.is_none()
    }
}

impl From<SectionEdit> for SectionPatch {
    fn from(edit: SectionEdit) -> Self {
        Self {
            title: edit.title,
            content: edit.content,
            payload: edit.payload,
            image_ref: edit.image_ref,
            ..Default::default()
        }
    }
}
