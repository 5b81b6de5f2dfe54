//! Ordering and persistence checks over a document's section list.
//!
//! Orders are 1-based. At rest every section of a document has a distinct
//! order; gaps are allowed (a removal leaves one) until the next reconcile
//! renumbers the list by position.

use crate::error::ValidationError;
use crate::ids::{DocumentId, SectionId};
use crate::result::ValidationResult;
use crate::section::Section;
use std::collections::{BTreeMap, BTreeSet};

/// Direction of a reorder relative to render sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the start of the document (smaller order)
    Up,
    /// Towards the end of the document (larger order)
    Down,
}

/// Order for a section appended after `sections`
///
/// Saturates at `u32::MAX`; the clash that leaves is resolved by `renumber`.
pub fn next_order(sections: &[Section]) -> u32 {
    sections
        .iter()
        .map(|s| s.order)
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Stable sort by order, ties broken by id
pub fn sort_by_order(sections: &mut [Section]) {
    sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

/// Assign orders `1..=n` following list position
///
/// Returns true when any order changed.
pub fn renumber(sections: &mut [Section]) -> bool {
    let mut changed = false;
    for (index, section) in sections.iter_mut().enumerate() {
        let order = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if section.order != order {
            section.order = order;
            changed = true;
        }
    }
    changed
}

/// Every order in the list must be used exactly once
pub fn check_orders(sections: &[Section]) -> ValidationResult<()> {
    let mut seen: BTreeMap<u32, &SectionId> = BTreeMap::new();
    for section in sections {
        if let Some(first) = seen.insert(section.order, &section.id) {
            return Err(ValidationError::DuplicateOrder {
                order: section.order,
                first: first.clone(),
                second: section.id.clone(),
            });
        }
    }
    Ok(())
}

/// Check a full list can be written for `document`
///
/// Each section must carry exactly this document id, ids must be unique and
/// payloads must match their kinds.
pub fn check_persistable(document: &DocumentId, sections: &[Section]) -> ValidationResult<()> {
    let mut ids = BTreeSet::new();
    for section in sections {
        match &section.document_id {
            None => return Err(ValidationError::MissingDocument(section.id.clone())),
            Some(found) if found != document => {
                return Err(ValidationError::DocumentMismatch {
                    section: section.id.clone(),
                    expected: document.to_string(),
                    found: found.to_string(),
                })
            }
            Some(_) => {}
        }

        if !ids.insert(&section.id) {
            return Err(ValidationError::DuplicateId(section.id.clone()));
        }

        section.check_shape()?;
    }
    Ok(())
}

/// Index of the section adjacent to `index` in `direction`, if any
pub fn neighbor(sections: &[Section], index: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => (index + 1 < sections.len()).then_some(index + 1),
    }
}
