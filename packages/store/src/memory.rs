//! # In-Memory Store
//!
//! A `RemoteStore` living in process memory. Besides backing tests and
//! demos it can imitate a real remote:
//!
//! - **Latency**: every call sleeps on the tokio clock first, so tests with a
//!   paused clock can hold a write "in flight" deterministically
//! - **Faults**: `fail_next` makes the next call of a kind fail once
//! - **Call log**: every attempted call is recorded, failed ones included

use crate::error::{StoreError, StoreResult};
use crate::remote::RemoteStore;
use crate::table::SectionTable;
use async_trait::async_trait;
use casework_common::{DocumentId, Section, SectionId, SectionPatch, ValidationError};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tracing::trace;

/// Kind of primitive store call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCallKind {
    List,
    Insert,
    Update,
    Delete,
}

/// A recorded call against the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List(DocumentId),
    Insert(Section),
    Update { id: SectionId, patch: SectionPatch },
    Delete(SectionId),
}

impl StoreCall {
    pub fn kind(&self) -> StoreCallKind {
        match self {
            StoreCall::List(_) => StoreCallKind::List,
            StoreCall::Insert(_) => StoreCallKind::Insert,
            StoreCall::Update { .. } => StoreCallKind::Update,
            StoreCall::Delete(_) => StoreCallKind::Delete,
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, StoreCall::List(_))
    }
}

#[derive(Default)]
struct MemoryState {
    table: SectionTable,
    calls: Vec<StoreCall>,
    faults: HashMap<StoreCallKind, VecDeque<StoreError>>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    latency: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `sections`
    pub fn with_sections(sections: impl IntoIterator<Item = Section>) -> StoreResult<Self> {
        Ok(Self {
            state: Mutex::new(MemoryState {
                table: SectionTable::from_rows(sections)?,
                ..Default::default()
            }),
            latency: Duration::ZERO,
        })
    }

    /// Delay every call by `latency` (tokio time)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the next call of `kind` fail with `error`
    ///
    /// Faults queue up: calling this twice fails the next two calls.
    pub async fn fail_next(&self, kind: StoreCallKind, error: StoreError) {
        self.state
            .lock()
            .await
            .faults
            .entry(kind)
            .or_default()
            .push_back(error);
    }

    /// Every call attempted so far
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// Attempted inserts, updates and deletes
    pub async fn writes(&self) -> Vec<StoreCall> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Current stored rows of a document, without logging a call
    pub async fn snapshot(&self, document_id: &DocumentId) -> Vec<Section> {
        self.state.lock().await.table.list(document_id)
    }

    pub async fn get(&self, id: &SectionId) -> Option<Section> {
        self.state.lock().await.table.get(id).cloned()
    }

    /// Record `call` and pop a pending fault for it
    async fn begin(&self, call: StoreCall) -> StoreResult<MutexGuard<'_, MemoryState>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let kind = call.kind();
        trace!("memory store call: {:?}", kind);
        let mut state = self.state.lock().await;
        state.calls.push(call);

        if let Some(error) = state.faults.get_mut(&kind).and_then(|q| q.pop_front()) {
            return Err(error);
        }
        Ok(state)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, document_id: &DocumentId) -> StoreResult<Vec<Section>> {
        let state = self.begin(StoreCall::List(document_id.clone())).await?;
        Ok(state.table.list(document_id))
    }

    async fn insert(&self, section: Section) -> StoreResult<Section> {
        // Validation happens before the call would reach a real remote
        section.check_shape()?;
        if section.document_id.is_none() {
            return Err(ValidationError::MissingDocument(section.id.clone()).into());
        }

        let mut state = self.begin(StoreCall::Insert(section.clone())).await?;
        state.table.insert(section)
    }

    async fn update(&self, id: &SectionId, patch: SectionPatch) -> StoreResult<()> {
        let mut state = self
            .begin(StoreCall::Update {
                id: id.clone(),
                patch: patch.clone(),
            })
            .await?;
        state.table.update(id, &patch).map(|_| ())
    }

    async fn delete(&self, id: &SectionId) -> StoreResult<()> {
        let mut state = self.begin(StoreCall::Delete(id.clone())).await?;
        state.table.delete(id).map(|_| ())
    }
}
