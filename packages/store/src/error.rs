//! Error types for remote store adapters

use casework_common::{SectionId, ValidationError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Section not found: {0}")]
    NotFound(SectionId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unknown store error: {0}")]
    Unknown(String),

    /// Rejected before anything was sent to the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Whether the request may succeed when simply issued again
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transport(_))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Transport(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
