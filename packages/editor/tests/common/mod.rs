#![allow(dead_code)]

use casework_common::{DocumentId, DocumentRef, Section, SectionId, SectionKind};
use casework_editor::{
    spawn_engine, EngineConfig, EngineEvent, EngineHandle, MemorySessionStore, SessionCache,
};
use casework_store::{MemoryStore, StoreCall};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

pub const DOC: &str = "case-42";

pub fn doc() -> DocumentId {
    DocumentId::new(DOC)
}

pub fn doc_ref() -> DocumentRef {
    DocumentRef::Saved(doc())
}

pub fn id(s: &str) -> SectionId {
    SectionId::from(s)
}

pub fn section(id: &str, kind: SectionKind, order: u32) -> Section {
    Section::with_id(SectionId::from(id), kind, Some(doc()), order)
}

/// `[A(1), B(2), C(3)]`, truncated to `n`
pub fn abc(n: usize) -> Vec<Section> {
    vec![
        section("a", SectionKind::Introduction, 1),
        section("b", SectionKind::Alignment, 2),
        section("c", SectionKind::FourParagraphs, 3),
    ]
    .into_iter()
    .take(n)
    .collect()
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub session: MemorySessionStore,
    pub engine: EngineHandle,
}

impl Harness {
    /// Engine over a store holding `sections`, not started yet
    pub fn new(store: MemoryStore, config: EngineConfig) -> Self {
        let store = Arc::new(store);
        let session = MemorySessionStore::new();
        let engine = spawn_engine(store.clone(), session.clone(), config);
        Self {
            store,
            session,
            engine,
        }
    }

    /// Engine started on `DOC` with an empty call log
    pub async fn loaded(sections: Vec<Section>, config: EngineConfig) -> Self {
        let harness = Self::new(MemoryStore::with_sections(sections).unwrap(), config);
        harness.engine.start(doc()).await.unwrap();
        harness.store.clear_calls().await;
        harness
    }

    pub fn cache(&self) -> SessionCache<MemorySessionStore> {
        SessionCache::new(self.session.clone())
    }

    pub async fn writes(&self) -> Vec<StoreCall> {
        self.store.writes().await
    }

    pub fn orders(&self) -> Vec<(String, u32)> {
        self.engine
            .view()
            .sections
            .iter()
            .map(|s| (s.id.to_string(), s.order))
            .collect()
    }
}

/// Let debounce timers expire (the test clock is paused, so this is instant)
pub async fn settle() {
    tokio::time::sleep(Duration::from_secs(2)).await;
}

pub fn drain(events: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}
