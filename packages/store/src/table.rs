//! Row storage shared by the store implementations.
//!
//! One row per section keyed by id, plus a secondary index on
//! `(document, order, id)`. The index is not unique: a reorder issued as two
//! single-row updates briefly holds two rows at the same order.

use crate::error::{StoreError, StoreResult};
use casework_common::{DocumentId, Section, SectionId, SectionPatch, ValidationError};
use std::collections::{BTreeMap, BTreeSet};

type IndexKey = (DocumentId, u32, SectionId);

#[derive(Debug, Default, Clone)]
pub struct SectionTable {
    rows: BTreeMap<SectionId, Section>,
    by_document: BTreeSet<IndexKey>,
}

fn index_key(section: &Section) -> StoreResult<IndexKey> {
    let document = section
        .document_id
        .clone()
        .ok_or_else(|| ValidationError::MissingDocument(section.id.clone()))?;
    Ok((document, section.order, section.id.clone()))
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from previously stored rows
    pub fn from_rows(rows: impl IntoIterator<Item = Section>) -> StoreResult<Self> {
        let mut table = Self::new();
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.rows.get(id)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Section> {
        self.rows.values()
    }

    /// Sections of one document, walked through the index
    pub fn list(&self, document: &DocumentId) -> Vec<Section> {
        let start = (document.clone(), 0, SectionId::from(""));
        self.by_document
            .range(start..)
            .take_while(|(doc, _, _)| doc == document)
            .filter_map(|(_, _, id)| self.rows.get(id).cloned())
            .collect()
    }

    pub fn insert(&mut self, section: Section) -> StoreResult<Section> {
        section.check_shape()?;
        let key = index_key(&section)?;
        if self.rows.contains_key(&section.id) {
            return Err(StoreError::Conflict(format!(
                "section {} already exists",
                section.id
            )));
        }
        self.by_document.insert(key);
        self.rows.insert(section.id.clone(), section.clone());
        Ok(section)
    }

    /// Apply a patch and return the updated row
    pub fn update(&mut self, id: &SectionId, patch: &SectionPatch) -> StoreResult<Section> {
        let row = self
            .rows
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let old_key = index_key(row)?;
        row.apply_patch(patch)?;
        let new_key = index_key(row)?;

        if old_key != new_key {
            self.by_document.remove(&old_key);
            self.by_document.insert(new_key);
        }
        Ok(row.clone())
    }

    pub fn delete(&mut self, id: &SectionId) -> StoreResult<Section> {
        let row = self
            .rows
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.by_document.remove(&index_key(&row)?);
        Ok(row)
    }
}
