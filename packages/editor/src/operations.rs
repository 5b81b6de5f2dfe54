//! # Section Operations
//!
//! The local half of every author-initiated change: each function mutates
//! the in-memory list and returns what the engine needs afterwards, namely
//! the remote write to issue and the record that undoes the change if that
//! write fails.
//!
//! Nothing in here touches the store or the clock. The engine decides when
//! writes run and which rollback policy applies.

use crate::disclosure::{Disclosure, DisclosureTracker};
use crate::errors::{SyncError, SyncResult};
use casework_common::{
    neighbor, next_order, sort_by_order, Direction, DocumentId, DocumentRef, Section, SectionEdit,
    SectionId, SectionKind, SectionPatch,
};
use casework_store::{ReconcileReport, RemoteStore, StoreResult};
use serde::{Deserialize, Serialize};

/// Operation name carried by failure events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Add,
    Remove,
    Reorder,
    Publish,
}

/// A write against the remote store
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RemoteWrite {
    Insert(Section),
    Delete(SectionId),
    Update {
        id: SectionId,
        patch: SectionPatch,
    },
    /// Two single-row order updates, issued in sequence
    Swap {
        first: (SectionId, SectionPatch),
        second: (SectionId, SectionPatch),
    },
    Reconcile {
        document: DocumentId,
        sections: Vec<Section>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WriteOutput {
    Inserted(Section),
    Applied,
    Reconciled(ReconcileReport),
}

impl RemoteWrite {
    pub(crate) async fn run(self, store: &dyn RemoteStore) -> StoreResult<WriteOutput> {
        match self {
            RemoteWrite::Insert(section) => store.insert(section).await.map(WriteOutput::Inserted),
            RemoteWrite::Delete(id) => store.delete(&id).await.map(|_| WriteOutput::Applied),
            RemoteWrite::Update { id, patch } => {
                store.update(&id, patch).await.map(|_| WriteOutput::Applied)
            }
            RemoteWrite::Swap { first, second } => {
                store.update(&first.0, first.1).await?;
                store.update(&second.0, second.1).await?;
                Ok(WriteOutput::Applied)
            }
            RemoteWrite::Reconcile { document, sections } => store
                .reconcile(&document, &sections)
                .await
                .map(WriteOutput::Reconciled),
        }
    }

    /// Bring a mirror of the remote rows in line with a successful write
    pub(crate) fn apply_to(&self, mirror: &mut Vec<Section>, output: &WriteOutput) {
        match (self, output) {
            (_, WriteOutput::Inserted(section)) => {
                mirror.retain(|s| s.id != section.id);
                mirror.push(section.clone());
            }
            (RemoteWrite::Delete(id), _) => mirror.retain(|s| &s.id != id),
            (RemoteWrite::Update { id, patch }, _) => patch_row(mirror, id, patch),
            (RemoteWrite::Swap { first, second }, _) => {
                patch_row(mirror, &first.0, &first.1);
                patch_row(mirror, &second.0, &second.1);
            }
            (RemoteWrite::Reconcile { sections, .. }, _) => *mirror = sections.clone(),
            (RemoteWrite::Insert(_), _) => {}
        }
        sort_by_order(mirror);
    }

    pub(crate) fn deleted(&self) -> Option<&SectionId> {
        match self {
            RemoteWrite::Delete(id) => Some(id),
            _ => None,
        }
    }
}

fn patch_row(rows: &mut [Section], id: &SectionId, patch: &SectionPatch) {
    if let Some(row) = rows.iter_mut().find(|s| &s.id == id) {
        // The store accepted this patch, so it cannot change the kind
        let _ = row.apply_patch(patch);
    }
}

/// Undo record for an optimistic change
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rollback {
    Added(SectionId),
    Removed {
        section: Section,
        index: usize,
        disclosure: Disclosure,
    },
    Swapped {
        first: (SectionId, u32),
        second: (SectionId, u32),
    },
    Published {
        id: SectionId,
        previous: bool,
    },
}

impl Rollback {
    pub(crate) fn operation(&self) -> OperationKind {
        match self {
            Rollback::Added(_) => OperationKind::Add,
            Rollback::Removed { .. } => OperationKind::Remove,
            Rollback::Swapped { .. } => OperationKind::Reorder,
            Rollback::Published { .. } => OperationKind::Publish,
        }
    }

    pub(crate) fn section(&self) -> &SectionId {
        match self {
            Rollback::Added(id) => id,
            Rollback::Removed { section, .. } => &section.id,
            Rollback::Swapped { first, .. } => &first.0,
            Rollback::Published { id, .. } => id,
        }
    }

    /// Undo the change; sections that disappeared since are skipped
    pub(crate) fn revert(self, sections: &mut Vec<Section>, disclosure: &mut DisclosureTracker) {
        match self {
            Rollback::Added(id) => {
                sections.retain(|s| s.id != id);
                disclosure.forget(&id);
            }
            Rollback::Removed {
                section,
                index,
                disclosure: state,
            } => {
                if sections.iter().any(|s| s.id == section.id) {
                    return;
                }
                disclosure.restore(&section.id, state);
                sections.insert(index.min(sections.len()), section);
            }
            Rollback::Swapped { first, second } => {
                for (id, order) in [first, second] {
                    if let Some(section) = sections.iter_mut().find(|s| s.id == id) {
                        section.order = order;
                    }
                }
                sort_by_order(sections);
            }
            Rollback::Published { id, previous } => {
                if let Some(section) = sections.iter_mut().find(|s| s.id == id) {
                    section.published = previous;
                }
            }
        }
    }
}

/// A local change with its remote write and undo record
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LocalChange {
    pub write: RemoteWrite,
    pub rollback: Rollback,
}

fn position(sections: &[Section], id: &SectionId) -> SyncResult<usize> {
    sections
        .iter()
        .position(|s| &s.id == id)
        .ok_or_else(|| SyncError::UnknownSection(id.clone()))
}

/// Append a new section of `kind` and mark it open
pub(crate) fn add(
    sections: &mut Vec<Section>,
    disclosure: &mut DisclosureTracker,
    document: &DocumentRef,
    kind: SectionKind,
) -> LocalChange {
    let section = Section::new(kind, document.id().cloned(), next_order(sections));
    disclosure.open(&section.id);
    sections.push(section.clone());

    LocalChange {
        rollback: Rollback::Added(section.id.clone()),
        write: RemoteWrite::Insert(section),
    }
}

/// Take a section out of the list and forget its disclosure state
pub(crate) fn remove(
    sections: &mut Vec<Section>,
    disclosure: &mut DisclosureTracker,
    id: &SectionId,
) -> SyncResult<LocalChange> {
    let index = position(sections, id)?;
    let section = sections.remove(index);
    let state = disclosure.forget(id);

    Ok(LocalChange {
        write: RemoteWrite::Delete(id.clone()),
        rollback: Rollback::Removed {
            section,
            index,
            disclosure: state,
        },
    })
}

/// Swap orders with the neighbour in `direction`
///
/// `None` when there is no neighbour; the list is left untouched.
pub(crate) fn reorder(
    sections: &mut [Section],
    id: &SectionId,
    direction: Direction,
) -> SyncResult<Option<LocalChange>> {
    sort_by_order(sections);
    let index = position(sections, id)?;
    let Some(other) = neighbor(sections, index, direction) else {
        return Ok(None);
    };

    let order = sections[index].order;
    let other_order = sections[other].order;
    let other_id = sections[other].id.clone();

    sections[index].order = other_order;
    sections[other].order = order;
    sections.swap(index, other);

    Ok(Some(LocalChange {
        write: RemoteWrite::Swap {
            first: (id.clone(), SectionPatch::order(other_order)),
            second: (other_id.clone(), SectionPatch::order(order)),
        },
        rollback: Rollback::Swapped {
            first: (id.clone(), order),
            second: (other_id, other_order),
        },
    }))
}

/// Set `published`; `None` when it already has that value
pub(crate) fn set_published(
    sections: &mut [Section],
    id: &SectionId,
    value: bool,
) -> SyncResult<Option<LocalChange>> {
    let index = position(sections, id)?;
    let previous = sections[index].published;
    if previous == value {
        return Ok(None);
    }
    sections[index].published = value;

    Ok(Some(LocalChange {
        write: RemoteWrite::Update {
            id: id.clone(),
            patch: SectionPatch::published(value),
        },
        rollback: Rollback::Published {
            id: id.clone(),
            previous,
        },
    }))
}

/// Apply a content edit; persisted later by the debounced reconcile
pub(crate) fn edit(sections: &mut [Section], id: &SectionId, edit: SectionEdit) -> SyncResult<()> {
    let index = position(sections, id)?;
    sections[index].apply_patch(&SectionPatch::from(edit))?;
    Ok(())
}
