//! # Casework Store
//!
//! The remote section record store, as seen by the sync engine.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ RemoteStore trait                           │
//! │  - list / insert / update / delete          │
//! │  - reconcile (built on the four primitives) │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ SectionTable: rows by id + (doc, order) idx │
//! └─────────────────────────────────────────────┘
//!            ↓                      ↓
//!      MemoryStore             FileStore
//!   (tests, latency,       (JSON file, atomic
//!    fault injection)        rewrite per write)
//! ```
//!
//! Adapters never retry. Every failure surfaces as a [`StoreError`] and the
//! caller decides what to do with it.

mod error;
mod file;
mod memory;
mod plan;
mod remote;
mod table;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::{MemoryStore, StoreCall, StoreCallKind};
pub use plan::{desired_rows, ReconcilePlan, ReconcileReport};
pub use remote::RemoteStore;
pub use table::SectionTable;
