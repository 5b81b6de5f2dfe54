//! Cloneable front end of the engine actor.
//!
//! Each method sends a command over mpsc and awaits the oneshot reply. State
//! is read from the watch channel; events come from the broadcast channel.

use super::view::{EngineEvent, EngineView, RefreshOutcome, RefreshTrigger};
use crate::errors::{SyncError, SyncResult};
use casework_common::{Direction, DocumentId, DocumentRef, SectionEdit, SectionId, SectionKind};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

type Reply<T> = oneshot::Sender<SyncResult<T>>;

/// Internal command sent from EngineHandle to the actor
pub(crate) enum Command {
    Start {
        document: DocumentRef,
        reply: Reply<()>,
    },
    Refresh {
        trigger: RefreshTrigger,
        reply: Reply<RefreshOutcome>,
    },
    Add {
        kind: SectionKind,
        reply: Reply<SectionId>,
    },
    Remove {
        id: SectionId,
        reply: Reply<()>,
    },
    Reorder {
        id: SectionId,
        direction: Direction,
        reply: Reply<bool>,
    },
    SetPublished {
        id: SectionId,
        value: bool,
        reply: Reply<bool>,
    },
    Edit {
        id: SectionId,
        edit: SectionEdit,
        reply: Reply<()>,
    },
    ToggleDisclosure {
        id: SectionId,
        reply: Reply<bool>,
    },
    Adopt {
        document: DocumentId,
        reply: Reply<()>,
    },
    Flush {
        reply: Reply<()>,
    },
    Close {
        reply: Reply<()>,
    },
    Shutdown {
        reply: Reply<()>,
    },
}

#[derive(Clone)]
pub struct EngineHandle {
    pub(crate) commands: mpsc::UnboundedSender<Command>,
    pub(crate) view: watch::Receiver<EngineView>,
    pub(crate) events: broadcast::Sender<EngineEvent>,
}

impl EngineHandle {
    async fn call<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> SyncResult<T> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .map_err(|_| SyncError::Shutdown)?;
        rx.await.map_err(|_| SyncError::Shutdown)?
    }

    /// Open a document, closing the current one first
    ///
    /// Resolves once the remote list has been fetched (saved documents) or
    /// immediately (unsaved).
    pub async fn start(&self, document: impl Into<DocumentRef>) -> SyncResult<()> {
        self.close().await?;
        let document = document.into();
        self.call(|reply| Command::Start { document, reply }).await
    }

    /// Re-fetch the remote list unless a write or load is in progress
    pub async fn refresh(&self, trigger: RefreshTrigger) -> SyncResult<RefreshOutcome> {
        self.call(|reply| Command::Refresh { trigger, reply }).await
    }

    /// Append a section of `kind`; resolves once the remote insert settles
    pub async fn add(&self, kind: SectionKind) -> SyncResult<SectionId> {
        self.call(|reply| Command::Add { kind, reply }).await
    }

    pub async fn remove(&self, id: &SectionId) -> SyncResult<()> {
        let id = id.clone();
        self.call(|reply| Command::Remove { id, reply }).await
    }

    /// Move a section one step; `false` when it is already at that end
    pub async fn reorder(&self, id: &SectionId, direction: Direction) -> SyncResult<bool> {
        let id = id.clone();
        self.call(|reply| Command::Reorder {
            id,
            direction,
            reply,
        })
        .await
    }

    /// Set publication state; `false` when it already had that value
    pub async fn toggle_published(&self, id: &SectionId, value: bool) -> SyncResult<bool> {
        let id = id.clone();
        self.call(|reply| Command::SetPublished { id, value, reply })
            .await
    }

    /// Local content edit, written by the next debounced reconcile
    pub async fn edit(&self, id: &SectionId, edit: SectionEdit) -> SyncResult<()> {
        let id = id.clone();
        self.call(|reply| Command::Edit { id, edit, reply }).await
    }

    /// Flip a section editor open or closed; `false` for unknown ids
    pub async fn toggle_disclosure(&self, id: &SectionId) -> SyncResult<bool> {
        let id = id.clone();
        self.call(|reply| Command::ToggleDisclosure { id, reply })
            .await
    }

    /// Attach the unsaved session to a document that now exists remotely
    pub async fn adopt(&self, document: DocumentId) -> SyncResult<()> {
        self.call(|reply| Command::Adopt { document, reply }).await
    }

    /// Write pending changes now and wait until nothing is outstanding
    pub async fn flush(&self) -> SyncResult<()> {
        self.call(|reply| Command::Flush { reply }).await
    }

    /// Flush, then drop the document and return to idle
    pub async fn close(&self) -> SyncResult<()> {
        self.call(|reply| Command::Close { reply }).await
    }

    /// Flush and stop the actor
    pub async fn shutdown(&self) -> SyncResult<()> {
        self.call(|reply| Command::Shutdown { reply }).await
    }

    /// Current view
    pub fn view(&self) -> EngineView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn watch(&self) -> watch::Receiver<EngineView> {
        self.view.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }
}
