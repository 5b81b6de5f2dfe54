//! # Session Cache
//!
//! A fast-path mirror of the in-memory section list, keyed per document and
//! scoped to the current session. It exists so a reload shows the last known
//! list before the remote fetch completes; it is never trusted over the
//! remote store.
//!
//! Keys:
//!
//! ```text
//! {namespace}:sections:{documentId}     section list of a saved document
//! {namespace}:sections:new              section list of the unsaved document
//! {namespace}:disclosure:{documentId}   disclosure snapshot (same suffixes)
//! ```

use crate::disclosure::DisclosureSnapshot;
use crate::errors::CacheError;
use casework_common::{DocumentRef, Section};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

const UNSAVED_SUFFIX: &str = "new";

/// Raw string key-value storage, the shape of browser session storage
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Process-local session storage
///
/// Clones share the same entries, so a test can keep one clone to inspect
/// what the engine wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panicked writer cannot leave a half-written String behind
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries().remove(key);
    }
}

/// Typed view over a [`SessionStore`]
pub struct SessionCache<S> {
    store: S,
    namespace: String,
}

impl<S: SessionStore> SessionCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, "casework")
    }

    pub fn with_namespace(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn sections_key(&self, document: &DocumentRef) -> String {
        self.key("sections", document)
    }

    pub fn disclosure_key(&self, document: &DocumentRef) -> String {
        self.key("disclosure", document)
    }

    fn key(&self, kind: &str, document: &DocumentRef) -> String {
        let suffix = match document {
            DocumentRef::Saved(id) => id.as_str(),
            DocumentRef::Unsaved => UNSAVED_SUFFIX,
        };
        format!("{}:{}:{}", self.namespace, kind, suffix)
    }

    /// Cached list for `document`; a value that does not parse is an error
    pub fn get(&self, document: &DocumentRef) -> Result<Option<Vec<Section>>, CacheError> {
        self.read(&self.sections_key(document))
    }

    /// Cached list for `document`, treating unparsable values as a miss
    ///
    /// The broken entry is discarded.
    pub fn load(&self, document: &DocumentRef) -> Option<Vec<Section>> {
        self.read_or_discard(&self.sections_key(document))
    }

    pub fn set(&self, document: &DocumentRef, sections: &[Section]) -> Result<(), CacheError> {
        self.write(&self.sections_key(document), sections)
    }

    pub fn remove(&self, document: &DocumentRef) {
        self.store.remove(&self.sections_key(document));
        self.store.remove(&self.disclosure_key(document));
    }

    pub fn load_disclosure(&self, document: &DocumentRef) -> Option<DisclosureSnapshot> {
        self.read_or_discard(&self.disclosure_key(document))
    }

    pub fn save_disclosure(
        &self,
        document: &DocumentRef,
        snapshot: &DisclosureSnapshot,
    ) -> Result<(), CacheError> {
        self.write(&self.disclosure_key(document), snapshot)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key) {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| CacheError::Parse {
                    key: key.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    fn read_or_discard<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding session cache entry: {}", e);
                self.store.remove(key);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value).map_err(|e| CacheError::Serialize {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(key, raw);
        Ok(())
    }
}
