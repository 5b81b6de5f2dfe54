//! What the engine publishes: the current view (watch channel) and notable
//! events (broadcast channel).

use crate::errors::SyncError;
use crate::operations::OperationKind;
use casework_common::{DocumentId, DocumentRef, Section, SectionId, ValidationError};
use casework_store::ReconcileReport;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// No document, or the last load failed
    #[default]
    Idle,
    /// Fetching the remote list
    Loading,
    /// Local state and remote agree as far as the engine knows
    Ready,
    /// A remote write is in flight, queued, or waiting on the debouncer
    Saving,
}

/// Snapshot of engine state for the UI
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineView {
    pub phase: Phase,
    pub document: Option<DocumentRef>,
    /// Sections in render order
    pub sections: Vec<Section>,
    /// Resolved disclosure state of every listed section
    pub disclosure: BTreeMap<SectionId, bool>,
    /// True while the list comes from the session cache, before the fetch
    pub provisional: bool,
    /// Sections whose remote delete has not resolved yet
    pub removing: BTreeSet<SectionId>,
    pub last_error: Option<String>,
}

impl EngineView {
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    pub fn is_open(&self, id: &SectionId) -> bool {
        self.disclosure.get(id).copied().unwrap_or(false)
    }

    pub fn ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The author asked for it
    Explicit,
    /// The remote signalled that the document changed
    RemoteChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    Loading,
    Saving,
    CoolingDown,
    /// Local changes have not reached the store yet
    Unsynced,
    Unsaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    Refused(RefusalReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Loaded {
        document: DocumentId,
        sections: usize,
    },
    LoadFailed {
        document: DocumentId,
        error: SyncError,
    },
    OperationFailed {
        operation: OperationKind,
        section: SectionId,
        error: SyncError,
    },
    RolledBack {
        operation: OperationKind,
        section: SectionId,
    },
    WriteCompleted(ReconcileReport),
    WriteSkipped,
    WriteFailed(SyncError),
    RefreshRefused(RefusalReason),
    ValidationFailed(ValidationError),
    Adopted(DocumentId),
}
