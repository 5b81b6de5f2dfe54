pub mod add;
pub mod edit;
pub mod list;
pub mod publish;
pub mod remove;
pub mod reorder;

pub use add::{add, AddArgs};
pub use edit::{edit, EditArgs};
pub use list::{list, ListArgs};
pub use publish::{publish, PublishArgs};
pub use remove::{remove, RemoveArgs};
pub use reorder::{reorder, MoveArgs};

use crate::config::Config;
use anyhow::{anyhow, Result};
use casework_common::{DocumentId, SectionId};
use casework_editor::{spawn_engine, EngineHandle, MemorySessionStore};
use casework_store::FileStore;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A started engine over the configured file store
pub struct Session {
    pub engine: EngineHandle,
    pub document: DocumentId,
}

impl Session {
    pub async fn open(cwd: &Path, document: DocumentId) -> Result<Self> {
        let config = Config::load(cwd)?;
        let store_path = config.store_path(cwd);
        debug!("Using section store {}", store_path.display());

        let store = FileStore::open(store_path).await?;
        let engine = spawn_engine(Arc::new(store), MemorySessionStore::new(), config.engine);
        engine.start(document.clone()).await?;

        Ok(Self { engine, document })
    }

    /// Resolve a full id or a unique prefix of one
    pub fn resolve(&self, input: &str) -> Result<SectionId> {
        let matches: Vec<SectionId> = self
            .engine
            .view()
            .sections
            .iter()
            .filter(|s| s.id.as_str().starts_with(input))
            .map(|s| s.id.clone())
            .collect();

        if let Some(exact) = matches.iter().find(|id| id.as_str() == input) {
            return Ok(exact.clone());
        }
        match matches.as_slice() {
            [only] => Ok(only.clone()),
            [] => Err(anyhow!("No section matches '{}' in {}", input, self.document)),
            _ => Err(anyhow!(
                "'{}' is ambiguous ({} sections match)",
                input,
                matches.len()
            )),
        }
    }

    /// Write everything outstanding and stop the engine
    pub async fn finish(self) -> Result<()> {
        self.engine.shutdown().await?;
        Ok(())
    }
}

/// First eight characters of an id, for display
pub fn short_id(id: &SectionId) -> &str {
    let s = id.as_str();
    s.char_indices().nth(8).map_or(s, |(end, _)| &s[..end])
}
