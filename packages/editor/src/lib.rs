//! # Casework Editor
//!
//! Section state synchronization for case-study documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ store: RemoteStore (durable source of truth)│
//! └─────────────────────────────────────────────┘
//!                     ↕  list / insert / update / delete / reconcile
//! ┌─────────────────────────────────────────────┐
//! │ editor: sync engine (actor)                 │
//! │  - Owns the authoritative in-memory list    │
//! │  - Optimistic operations + rollback policy  │
//! │  - Debounced full-list reconcile            │
//! │  - Phase guard: one write in flight         │
//! └─────────────────────────────────────────────┘
//!          ↓ mirror                 ↓ derived
//! ┌──────────────────┐   ┌──────────────────────┐
//! │ session cache    │   │ disclosure tracker   │
//! └──────────────────┘   └──────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One authoritative list**: the engine owns it; cache and store mirror it
//! 2. **Local first**: every operation updates local state before any I/O
//! 3. **Serialized writes**: at most one remote write is outstanding
//! 4. **Remote wins on load**: a fetch replaces cached, provisional state
//!
//! ## Usage
//!
//! ```rust,ignore
//! use casework_editor::{spawn_engine, EngineConfig, MemorySessionStore};
//! use casework_common::{DocumentId, SectionKind};
//!
//! let engine = spawn_engine(store, MemorySessionStore::new(), EngineConfig::default());
//! engine.start(DocumentId::new("case-42")).await?;
//!
//! let id = engine.add(SectionKind::Carousel).await?;
//! engine.edit(&id, SectionEdit::title("Gallery")).await?;
//! engine.flush().await?;
//! ```

mod cache;
mod config;
mod debounce;
mod disclosure;
mod engine;
mod errors;
mod operations;

pub use cache::{MemorySessionStore, SessionCache, SessionStore};
pub use config::{EngineConfig, RollbackPolicy};
pub use debounce::Debouncer;
pub use disclosure::{Disclosure, DisclosureSnapshot, DisclosureTracker};
pub use engine::{
    spawn_engine, EngineEvent, EngineHandle, EngineView, Phase, RefreshOutcome, RefreshTrigger,
    RefusalReason,
};
pub use errors::{CacheError, SyncError, SyncResult};
pub use operations::OperationKind;
