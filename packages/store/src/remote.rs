//! # Remote Store Contract
//!
//! Create/read/update/delete by id, plus a full-list reconcile. Only
//! `reconcile` changes orders in bulk; every other call touches one section.

use crate::error::StoreResult;
use crate::plan::{desired_rows, ReconcilePlan, ReconcileReport};
use async_trait::async_trait;
use casework_common::{DocumentId, Section, SectionId, SectionPatch};
use tracing::debug;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Sections of a document ordered by `(order, id)`
    async fn list(&self, document_id: &DocumentId) -> StoreResult<Vec<Section>>;

    /// Persist a new section; `Conflict` when the id already exists
    async fn insert(&self, section: Section) -> StoreResult<Section>;

    /// Apply a partial update; `NotFound` when the id does not exist
    async fn update(&self, id: &SectionId, patch: SectionPatch) -> StoreResult<()>;

    /// Remove a section; `NotFound` when the id does not exist
    async fn delete(&self, id: &SectionId) -> StoreResult<()>;

    /// Make the stored rows of `document_id` equal `sections`
    ///
    /// Orders are set to list position + 1. Sections that already match their
    /// stored row are not written, so reconciling the same list twice writes
    /// nothing the second time. The list is validated before anything is
    /// fetched or written.
    async fn reconcile(
        &self,
        document_id: &DocumentId,
        sections: &[Section],
    ) -> StoreResult<ReconcileReport> {
        let desired = desired_rows(document_id, sections)?;
        let existing = self.list(document_id).await?;
        let plan = ReconcilePlan::compute(&existing, &desired);

        debug!(
            "reconcile {}: {} deletes, {} inserts, {} updates, {} unchanged",
            document_id,
            plan.deletes.len(),
            plan.inserts.len(),
            plan.updates.len(),
            plan.unchanged
        );

        let report = plan.report();
        if plan.is_noop() {
            return Ok(report);
        }
        let ReconcilePlan {
            deletes,
            inserts,
            updates,
            ..
        } = plan;

        for id in &deletes {
            self.delete(id).await?;
        }
        for section in inserts {
            self.insert(section).await?;
        }
        for (id, patch) in updates {
            self.update(&id, patch).await?;
        }

        Ok(report)
    }
}
