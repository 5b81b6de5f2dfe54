//! # File-Backed Store
//!
//! Keeps every section row of every document in one JSON file. The file is
//! read once on open; each successful write rewrites it through a temporary
//! file and a rename, so a crash leaves either the old or the new contents.

use crate::error::{StoreError, StoreResult};
use crate::remote::RemoteStore;
use crate::table::SectionTable;
use async_trait::async_trait;
use casework_common::{DocumentId, Section, SectionId, SectionPatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRow {
    #[serde(flatten)]
    section: Section,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    sections: Vec<StoredRow>,
}

struct FileState {
    table: SectionTable,
    updated_at: BTreeMap<SectionId, DateTime<Utc>>,
}

pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileStore {
    /// Open the store at `path`, starting empty when the file does not exist
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let state = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let file: StoreFile = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Unknown(format!("{}: {}", path.display(), e)))?;
                if file.version != FORMAT_VERSION {
                    return Err(StoreError::Unknown(format!(
                        "{}: unsupported store version {}",
                        path.display(),
                        file.version
                    )));
                }

                let mut updated_at = BTreeMap::new();
                let mut rows = Vec::with_capacity(file.sections.len());
                for row in file.sections {
                    updated_at.insert(row.section.id.clone(), row.updated_at);
                    rows.push(row.section);
                }
                info!("Opened section store {} ({} rows)", path.display(), rows.len());
                FileState {
                    table: SectionTable::from_rows(rows)?,
                    updated_at,
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating section store {}", path.display());
                FileState {
                    table: SectionTable::new(),
                    updated_at: BTreeMap::new(),
                }
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When a section row was last written
    pub async fn updated_at(&self, id: &SectionId) -> Option<DateTime<Utc>> {
        self.state.lock().await.updated_at.get(id).copied()
    }

    async fn persist(&self, state: &FileState) -> StoreResult<()> {
        let sections = state
            .table
            .rows()
            .map(|section| StoredRow {
                section: section.clone(),
                updated_at: state
                    .updated_at
                    .get(&section.id)
                    .copied()
                    .unwrap_or_else(Utc::now),
            })
            .collect();
        let file = StoreFile {
            version: FORMAT_VERSION,
            sections,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| StoreError::Unknown(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote {} rows to {}", state.table.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FileStore {
    async fn list(&self, document_id: &DocumentId) -> StoreResult<Vec<Section>> {
        Ok(self.state.lock().await.table.list(document_id))
    }

    async fn insert(&self, section: Section) -> StoreResult<Section> {
        let mut state = self.state.lock().await;
        let inserted = state.table.insert(section)?;
        state.updated_at.insert(inserted.id.clone(), Utc::now());

        if let Err(e) = self.persist(&state).await {
            // Keep memory and disk in agreement
            state.table.delete(&inserted.id)?;
            state.updated_at.remove(&inserted.id);
            return Err(e);
        }
        Ok(inserted)
    }

    async fn update(&self, id: &SectionId, patch: SectionPatch) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let before = state
            .table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let previous_stamp = state.updated_at.get(id).copied();

        state.table.update(id, &patch)?;
        state.updated_at.insert(id.clone(), Utc::now());

        if let Err(e) = self.persist(&state).await {
            let revert = SectionPatch::between(state.table.get(id).unwrap_or(&before), &before);
            state.table.update(id, &revert)?;
            match previous_stamp {
                Some(stamp) => state.updated_at.insert(id.clone(), stamp),
                None => state.updated_at.remove(id),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, id: &SectionId) -> StoreResult<()> {
        let mut state = self.state.lock().await;
        let removed = state.table.delete(id)?;
        let stamp = state.updated_at.remove(id);

        if let Err(e) = self.persist(&state).await {
            state.table.insert(removed)?;
            if let Some(stamp) = stamp {
                state.updated_at.insert(id.clone(), stamp);
            }
            return Err(e);
        }
        Ok(())
    }
}
