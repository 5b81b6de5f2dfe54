use crate::ids::SectionId;
use crate::section::SectionKind;
use thiserror::Error;

/// A write that must never reach the remote store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Section {0} has no document and cannot be persisted")]
    MissingDocument(SectionId),

    #[error("Section {section} belongs to document {found}, expected {expected}")]
    DocumentMismatch {
        section: SectionId,
        expected: String,
        found: String,
    },

    #[error("Order {order} is used by both {first} and {second}")]
    DuplicateOrder {
        order: u32,
        first: SectionId,
        second: SectionId,
    },

    #[error("Section {0} appears more than once")]
    DuplicateId(SectionId),

    #[error("Section {section} is {kind:?} and cannot take a {attempted:?} payload")]
    KindChange {
        section: SectionId,
        kind: SectionKind,
        attempted: SectionKind,
    },
}
