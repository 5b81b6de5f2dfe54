//! # Reconcile Planning
//!
//! Works out which primitive writes turn the stored rows of a document into
//! the desired list. Pure, so adapters and tests share it.
//!
//! - ids stored but absent from the list are deleted
//! - ids in the list but not stored are inserted
//! - ids in both get their minimal patch, or nothing when already equal
//! - a stored row whose kind differs is deleted and re-inserted (kinds are
//!   immutable)

use casework_common::{
    check_persistable, renumber, DocumentId, Section, SectionId, SectionPatch, ValidationResult,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Writes needed to reconcile one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    pub deletes: Vec<SectionId>,
    pub inserts: Vec<Section>,
    pub updates: Vec<(SectionId, SectionPatch)>,
    pub unchanged: usize,
}

/// Summary of a completed reconcile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl ReconcileReport {
    /// Number of primitive writes issued
    pub fn writes(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// Validate `sections` for `document` and assign orders by position
pub fn desired_rows(document: &DocumentId, sections: &[Section]) -> ValidationResult<Vec<Section>> {
    check_persistable(document, sections)?;
    let mut rows = sections.to_vec();
    renumber(&mut rows);
    Ok(rows)
}

impl ReconcilePlan {
    pub fn compute(existing: &[Section], desired: &[Section]) -> Self {
        let stored: BTreeMap<&SectionId, &Section> = existing.iter().map(|s| (&s.id, s)).collect();
        let wanted: BTreeSet<&SectionId> = desired.iter().map(|s| &s.id).collect();

        let mut plan = ReconcilePlan::default();

        for section in existing {
            if !wanted.contains(&section.id) {
                plan.deletes.push(section.id.clone());
            }
        }

        for section in desired {
            match stored.get(&section.id) {
                None => plan.inserts.push(section.clone()),
                Some(current) if current.kind != section.kind => {
                    plan.deletes.push(section.id.clone());
                    plan.inserts.push(section.clone());
                }
                Some(current) => {
                    let patch = SectionPatch::between(current, section);
                    if patch.is_empty() {
                        plan.unchanged += 1;
                    } else {
                        plan.updates.push((section.id.clone(), patch));
                    }
                }
            }
        }

        plan
    }

    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty() && self.inserts.is_empty() && self.updates.is_empty()
    }

    pub fn report(&self) -> ReconcileReport {
        ReconcileReport {
            inserted: self.inserts.len(),
            updated: self.updates.len(),
            deleted: self.deletes.len(),
            unchanged: self.unchanged,
        }
    }
}
