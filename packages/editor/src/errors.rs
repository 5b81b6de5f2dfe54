//! Error types for the editor

use crate::engine::Phase;
use casework_common::{SectionId, ValidationError};
use casework_store::StoreError;
use thiserror::Error;

/// Session cache failures. The cache is never a correctness source, so the
/// engine logs these and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cached value under {key} does not parse: {message}")]
    Parse { key: String, message: String },

    #[error("Cannot serialize value for {key}: {message}")]
    Serialize { key: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unknown section: {0}")]
    UnknownSection(SectionId),

    #[error("Engine is not ready for changes (phase {0:?})")]
    NotReady(Phase),

    #[error("Session already belongs to a saved document")]
    AlreadySaved,

    #[error("Engine has shut down")]
    Shutdown,
}

pub type SyncResult<T> = Result<T, SyncError>;
