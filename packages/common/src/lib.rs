//! # Casework Common
//!
//! Section data model shared by the store, the editor engine and the CLI.
//!
//! A case study document is an ordered list of [`Section`]s. Each section has
//! an immutable [`SectionKind`] and a [`SectionPayload`] whose variant always
//! matches that kind. Nothing in this crate talks to a store; it only defines
//! the values that move between the in-memory list, the session cache and the
//! remote store, plus the validation every write goes through.

pub mod error;
pub mod ids;
pub mod ordering;
pub mod patch;
pub mod payload;
pub mod result;
pub mod section;

pub use error::*;
pub use ids::*;
pub use ordering::*;
pub use patch::*;
pub use payload::*;
pub use result::*;
pub use section::*;
