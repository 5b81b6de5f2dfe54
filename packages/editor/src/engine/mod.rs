//! # Sync Engine
//!
//! Keeps the in-memory section list, the session cache and the remote store
//! consistent. Local changes apply synchronously; remote writes go through a
//! single in-flight slot; content edits are coalesced by a debouncer into one
//! full-list reconcile.
//!
//! ## Phases
//!
//! ```text
//!            start(saved)              fetch ok
//!   Idle ─────────────────▶ Loading ─────────────▶ Ready ◀──┐
//!    ▲  ◀─────────────────     ▲       fetch err      │      │ write done,
//!    │       close             │                      │      │ queue empty
//!    │                         │ refresh              ▼      │
//!    │                         └────────────────── Saving ───┘
//!    │                          (refused while      (in flight, queued
//!    └── start(unsaved) ▶ Ready   Saving/cooling)     or debounced)
//! ```

mod actor;
mod handle;
mod view;

pub use handle::EngineHandle;
pub use view::{EngineEvent, EngineView, Phase, RefreshOutcome, RefreshTrigger, RefusalReason};

use crate::cache::{SessionCache, SessionStore};
use crate::config::EngineConfig;
use actor::EngineActor;
use casework_store::RemoteStore;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// Spawn the engine actor on the current tokio runtime
///
/// The session store is wrapped in a [`SessionCache`] using the configured
/// namespace. Returns a handle that can be cloned freely; the actor stops
/// when `shutdown` is called or every handle is dropped.
pub fn spawn_engine<R, S>(store: Arc<R>, session: S, config: EngineConfig) -> EngineHandle
where
    R: RemoteStore + 'static,
    S: SessionStore,
{
    let store: Arc<dyn RemoteStore> = store;
    let cache = SessionCache::with_namespace(session, config.cache_namespace.clone());

    let (commands, command_rx) = mpsc::unbounded_channel();
    let (completions, completion_rx) = mpsc::unbounded_channel();
    let (view_tx, view) = watch::channel(EngineView::default());
    let (events, _) = broadcast::channel(EVENT_CAPACITY);

    debug!(
        "Spawning sync engine (debounce {}ms, cooldown {}ms, rollback {:?})",
        config.debounce_ms, config.cooldown_ms, config.rollback
    );
    let actor = EngineActor::new(store, cache, config, completions, view_tx, events.clone());
    tokio::spawn(actor.run(command_rx, completion_rx));

    EngineHandle {
        commands,
        view,
        events,
    }
}
