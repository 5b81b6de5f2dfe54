//! The engine actor: sole owner of the section list, the remote mirror, the
//! debouncer and the write queue.
//!
//! ```text
//!   EngineHandle (Clone)      mpsc      EngineActor (tokio task)
//!   ┌───────────────────┐  ────────▶  ┌──────────────────────────────┐
//!   │ .add() .remove()  │             │ sections / mirror / phase    │
//!   │ .reorder() ...    │  ◀────────  │ debouncer + write queue      │
//!   └───────────────────┘   oneshot   └──────────────────────────────┘
//!            ▲                           │ spawn            ▲
//!            │ watch (EngineView)        ▼                  │ completions
//!            │ broadcast (EngineEvent)  RemoteStore calls ──┘
//! ```
//!
//! Every state change happens inside `run`, one event at a time. Remote
//! calls run in spawned tasks and report back on the completion channel,
//! tagged with the session epoch so results from a closed session are
//! dropped. At most one write is outstanding; later ones wait in FIFO order.

use super::handle::Command;
use super::view::{EngineEvent, EngineView, Phase, RefreshOutcome, RefreshTrigger, RefusalReason};
use crate::cache::{SessionCache, SessionStore};
use crate::config::{EngineConfig, RollbackPolicy};
use crate::debounce::{sleep_until, Debouncer};
use crate::disclosure::DisclosureTracker;
use crate::errors::{SyncError, SyncResult};
use crate::operations::{self, LocalChange, RemoteWrite, Rollback, WriteOutput};
use casework_common::{
    check_orders, check_persistable, renumber, sort_by_order, DocumentId, DocumentRef, Section,
    SectionId,
};
use casework_store::{RemoteStore, StoreError, StoreResult};
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Reply with the error and bail out unless a document is open and loaded
macro_rules! active_or_reply {
    ($self:ident, $reply:ident) => {
        match $self.active_document() {
            Ok(document) => document,
            Err(e) => {
                let _ = $reply.send(Err(e));
                return;
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Loading,
    Active,
}

pub(crate) enum Completion {
    Fetched {
        epoch: u64,
        result: StoreResult<Vec<Section>>,
    },
    Written {
        epoch: u64,
        result: StoreResult<WriteOutput>,
    },
}

/// Who is waiting on an operation's remote write
enum Responder {
    Added(oneshot::Sender<SyncResult<SectionId>>, SectionId),
    Removed(oneshot::Sender<SyncResult<()>>),
    Changed(oneshot::Sender<SyncResult<bool>>),
}

impl Responder {
    fn send(self, result: SyncResult<()>) {
        match self {
            Responder::Added(tx, id) => {
                let _ = tx.send(result.map(|_| id));
            }
            Responder::Removed(tx) => {
                let _ = tx.send(result);
            }
            Responder::Changed(tx) => {
                let _ = tx.send(result.map(|_| true));
            }
        }
    }
}

enum LoadWaiter {
    Start(oneshot::Sender<SyncResult<()>>),
    Refresh(oneshot::Sender<SyncResult<RefreshOutcome>>),
}

impl LoadWaiter {
    fn send(self, result: SyncResult<()>) {
        match self {
            LoadWaiter::Start(tx) => {
                let _ = tx.send(result);
            }
            LoadWaiter::Refresh(tx) => {
                let _ = tx.send(result.map(|_| RefreshOutcome::Refreshed));
            }
        }
    }
}

struct Job {
    write: RemoteWrite,
    rollback: Option<Rollback>,
    responder: Option<Responder>,
}

fn snapshot(sections: &[Section]) -> Option<String> {
    serde_json::to_string(sections).ok()
}

fn same_snapshot(local: &[Section], mirror: &[Section]) -> bool {
    match (snapshot(local), snapshot(mirror)) {
        (Some(local), Some(mirror)) => local == mirror,
        _ => false,
    }
}

pub(crate) struct EngineActor<S> {
    store: Arc<dyn RemoteStore>,
    cache: SessionCache<S>,
    config: EngineConfig,

    lifecycle: Lifecycle,
    document: Option<DocumentRef>,
    sections: Vec<Section>,
    /// What the engine believes the remote holds for the document
    mirror: Vec<Section>,
    /// Set after a failed write; the next flush reconciles unconditionally
    mirror_stale: bool,
    provisional: bool,
    disclosure: DisclosureTracker,
    removing: BTreeSet<SectionId>,
    last_error: Option<String>,

    debouncer: Debouncer,
    queue: VecDeque<Job>,
    in_flight: Option<Job>,
    flush_wanted: bool,
    flush_error: Option<SyncError>,
    cooldown_until: Option<Instant>,
    epoch: u64,

    load_waiter: Option<LoadWaiter>,
    flush_waiters: Vec<oneshot::Sender<SyncResult<()>>>,
    close_waiters: Vec<oneshot::Sender<SyncResult<()>>>,
    shutdown_waiter: Option<oneshot::Sender<SyncResult<()>>>,
    stopped: bool,

    completions: mpsc::UnboundedSender<Completion>,
    view: watch::Sender<EngineView>,
    events: broadcast::Sender<EngineEvent>,
}

impl<S: SessionStore> EngineActor<S> {
    pub(crate) fn new(
        store: Arc<dyn RemoteStore>,
        cache: SessionCache<S>,
        config: EngineConfig,
        completions: mpsc::UnboundedSender<Completion>,
        view: watch::Sender<EngineView>,
        events: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            store,
            cache,
            debouncer: Debouncer::new(config.debounce()),
            config,
            lifecycle: Lifecycle::Idle,
            document: None,
            sections: Vec::new(),
            mirror: Vec::new(),
            mirror_stale: false,
            provisional: false,
            disclosure: DisclosureTracker::new(),
            removing: BTreeSet::new(),
            last_error: None,
            queue: VecDeque::new(),
            in_flight: None,
            flush_wanted: false,
            flush_error: None,
            cooldown_until: None,
            epoch: 0,
            load_waiter: None,
            flush_waiters: Vec::new(),
            close_waiters: Vec::new(),
            shutdown_waiter: None,
            stopped: false,
            completions,
            view,
            events,
        }
    }

    /// Process commands, completions and debounce expiries until stopped
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!("All engine handles dropped, stopping");
                        break;
                    }
                },
                Some(completion) = completions.recv() => self.handle_completion(completion),
                _ = sleep_until(deadline) => self.on_debounce(),
            }

            self.settle();
            self.publish();
            if self.stopped {
                debug!("Engine stopped");
                break;
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { document, reply } => self.start(document, reply),
            Command::Refresh { trigger, reply } => self.refresh(trigger, reply),
            Command::Add { kind, reply } => {
                let document = active_or_reply!(self, reply);
                let change =
                    operations::add(&mut self.sections, &mut self.disclosure, &document, kind);
                let id = change.rollback.section().clone();
                debug!("Added {} section {}", kind, id);
                self.submit(&document, change, Responder::Added(reply, id));
            }
            Command::Remove { id, reply } => {
                let document = active_or_reply!(self, reply);
                match operations::remove(&mut self.sections, &mut self.disclosure, &id) {
                    Ok(change) => {
                        debug!("Removed section {}", id);
                        if document.is_saved() {
                            self.removing.insert(id);
                        }
                        self.submit(&document, change, Responder::Removed(reply));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::Reorder {
                id,
                direction,
                reply,
            } => {
                let document = active_or_reply!(self, reply);
                match operations::reorder(&mut self.sections, &id, direction) {
                    Ok(Some(change)) => {
                        debug!("Moved section {} {:?}", id, direction);
                        self.submit(&document, change, Responder::Changed(reply));
                    }
                    Ok(None) => {
                        let _ = reply.send(Ok(false));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::SetPublished { id, value, reply } => {
                let document = active_or_reply!(self, reply);
                match operations::set_published(&mut self.sections, &id, value) {
                    Ok(Some(change)) => {
                        debug!("Set section {} published={}", id, value);
                        self.submit(&document, change, Responder::Changed(reply));
                    }
                    Ok(None) => {
                        let _ = reply.send(Ok(false));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            Command::Edit { id, edit, reply } => {
                let document = active_or_reply!(self, reply);
                let result = operations::edit(&mut self.sections, &id, edit);
                if result.is_ok() {
                    self.after_local_change(&document);
                }
                let _ = reply.send(result);
            }
            Command::ToggleDisclosure { id, reply } => {
                let known = self.sections.iter().any(|s| s.id == id);
                if known {
                    let open = self.disclosure.toggle(&id, self.config.open_by_default);
                    debug!("Section {} now {}", id, if open { "open" } else { "closed" });
                    self.write_cache();
                }
                let _ = reply.send(Ok(known));
            }
            Command::Adopt { document, reply } => {
                let result = self.adopt(document);
                let _ = reply.send(result);
            }
            Command::Flush { reply } => {
                if self.lifecycle != Lifecycle::Active {
                    let _ = reply.send(Ok(()));
                    return;
                }
                self.flush_waiters.push(reply);
                self.request_flush();
            }
            Command::Close { reply } => {
                if self.lifecycle != Lifecycle::Active {
                    self.reset();
                    let _ = reply.send(Ok(()));
                    return;
                }
                self.close_waiters.push(reply);
                self.request_flush();
            }
            Command::Shutdown { reply } => {
                if self.lifecycle != Lifecycle::Active {
                    self.stopped = true;
                    let _ = reply.send(Ok(()));
                    return;
                }
                self.shutdown_waiter = Some(reply);
                self.request_flush();
            }
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    fn start(&mut self, document: DocumentRef, reply: oneshot::Sender<SyncResult<()>>) {
        if self.lifecycle != Lifecycle::Idle || self.document.is_some() {
            self.reset();
        }

        self.epoch += 1;
        self.document = Some(document.clone());
        self.disclosure = self
            .cache
            .load_disclosure(&document)
            .map(DisclosureTracker::from_snapshot)
            .unwrap_or_default();
        let cached = self.cache.load(&document);

        match document {
            DocumentRef::Unsaved => {
                self.sections = cached.unwrap_or_default();
                sort_by_order(&mut self.sections);
                self.lifecycle = Lifecycle::Active;
                debug!("Started unsaved document with {} sections", self.sections.len());
                let _ = reply.send(Ok(()));
            }
            DocumentRef::Saved(id) => {
                if let Some(mut cached) = cached {
                    sort_by_order(&mut cached);
                    debug!("Showing {} cached sections for {}", cached.len(), id);
                    self.sections = cached;
                    self.provisional = true;
                }
                self.lifecycle = Lifecycle::Loading;
                self.load_waiter = Some(LoadWaiter::Start(reply));
                self.spawn_fetch(id);
            }
        }
    }

    /// Re-fetch the remote list unless a load or write is in progress
    fn refresh(
        &mut self,
        trigger: RefreshTrigger,
        reply: oneshot::Sender<SyncResult<RefreshOutcome>>,
    ) {
        let Some(document) = self.document.clone() else {
            let _ = reply.send(Err(SyncError::NotReady(self.phase())));
            return;
        };

        let refusal = match self.phase() {
            Phase::Loading => Some(RefusalReason::Loading),
            Phase::Saving => Some(RefusalReason::Saving),
            _ if self.cooling_down() => Some(RefusalReason::CoolingDown),
            _ if self.mirror_stale && trigger == RefreshTrigger::RemoteChanged => {
                Some(RefusalReason::Unsynced)
            }
            _ => None,
        };

        match (refusal, document) {
            (None, DocumentRef::Saved(id)) => {
                debug!("Refreshing {} ({:?})", id, trigger);
                self.lifecycle = Lifecycle::Loading;
                self.load_waiter = Some(LoadWaiter::Refresh(reply));
                self.spawn_fetch(id);
            }
            (refusal, _) => {
                let reason = refusal.unwrap_or(RefusalReason::Unsaved);
                debug!("Refresh ({:?}) refused: {:?}", trigger, reason);
                self.emit(EngineEvent::RefreshRefused(reason));
                let _ = reply.send(Ok(RefreshOutcome::Refused(reason)));
            }
        }
    }

    fn adopt(&mut self, document: DocumentId) -> SyncResult<()> {
        match (&self.document, self.lifecycle) {
            (Some(DocumentRef::Unsaved), Lifecycle::Active) => {}
            (Some(DocumentRef::Saved(_)), _) => return Err(SyncError::AlreadySaved),
            _ => return Err(SyncError::NotReady(self.phase())),
        }

        for section in &mut self.sections {
            section.document_id = Some(document.clone());
        }
        self.cache.remove(&DocumentRef::Unsaved);

        let saved = DocumentRef::Saved(document.clone());
        self.document = Some(saved.clone());
        self.mirror.clear();
        self.mirror_stale = true;
        info!("Adopted {} sections into {}", self.sections.len(), document);

        self.after_local_change(&saved);
        self.emit(EngineEvent::Adopted(document));
        Ok(())
    }

    /// Drop the document and everything derived from it
    fn reset(&mut self) {
        if let Some(DocumentRef::Saved(id)) = &self.document {
            debug!("Closing {}", id);
        }
        self.epoch += 1;
        self.lifecycle = Lifecycle::Idle;
        self.document = None;
        self.sections.clear();
        self.mirror.clear();
        self.mirror_stale = false;
        self.provisional = false;
        self.disclosure = DisclosureTracker::new();
        self.removing.clear();
        self.last_error = None;
        self.debouncer.cancel();
        self.queue.clear();
        self.in_flight = None;
        self.flush_wanted = false;
        self.flush_error = None;
        self.cooldown_until = None;
        if let Some(waiter) = self.load_waiter.take() {
            waiter.send(Err(SyncError::NotReady(Phase::Idle)));
        }
    }

    // ── Local changes ────────────────────────────────────────────────

    fn active_document(&self) -> SyncResult<DocumentRef> {
        match (self.lifecycle, &self.document) {
            (Lifecycle::Active, Some(document)) => Ok(document.clone()),
            _ => Err(SyncError::NotReady(self.phase())),
        }
    }

    /// Mirror the change into the cache and (re)arm the debouncer
    fn after_local_change(&mut self, document: &DocumentRef) {
        self.write_cache();
        if document.is_saved() {
            self.debouncer.schedule();
        }
    }

    /// Queue the remote half of an operation; unsaved documents stay local
    fn submit(&mut self, document: &DocumentRef, change: LocalChange, responder: Responder) {
        self.after_local_change(document);
        if !document.is_saved() {
            responder.send(Ok(()));
            return;
        }
        self.enqueue(Job {
            write: change.write,
            rollback: Some(change.rollback),
            responder: Some(responder),
        });
    }

    fn write_cache(&self) {
        let Some(document) = &self.document else {
            return;
        };
        if let Err(e) = self.cache.set(document, &self.sections) {
            warn!("Session cache write failed: {}", e);
        }
        if let Err(e) = self.cache.save_disclosure(document, &self.disclosure.snapshot()) {
            warn!("Session cache write failed: {}", e);
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
        self.dispatch_next();
    }

    fn dispatch_next(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        let Some(job) = self.queue.pop_front() else {
            return;
        };

        let write = job.write.clone();
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = write.run(store.as_ref()).await;
            let _ = completions.send(Completion::Written { epoch, result });
        });
        self.in_flight = Some(job);
    }

    fn spawn_fetch(&self, document: DocumentId) {
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let result = store.list(&document).await;
            let _ = completions.send(Completion::Fetched { epoch, result });
        });
    }

    fn request_flush(&mut self) {
        self.debouncer.cancel();
        self.flush_wanted = true;
        self.maybe_flush();
    }

    fn on_debounce(&mut self) {
        if self.debouncer.fire(Instant::now()) {
            debug!("Debounce elapsed");
            self.flush_wanted = true;
            self.maybe_flush();
        }
    }

    /// Reconcile the whole list if a flush is wanted and the queue is empty
    fn maybe_flush(&mut self) {
        if !self.flush_wanted || self.in_flight.is_some() || !self.queue.is_empty() {
            return;
        }
        self.flush_wanted = false;
        if self.lifecycle != Lifecycle::Active {
            return;
        }
        let Some(DocumentRef::Saved(document)) = self.document.clone() else {
            return;
        };

        if renumber(&mut self.sections) {
            self.write_cache();
        }

        let checked = check_persistable(&document, &self.sections)
            .and_then(|_| check_orders(&self.sections));
        if let Err(e) = checked {
            warn!("Not writing {}: {}", document, e);
            self.last_error = Some(e.to_string());
            self.emit(EngineEvent::ValidationFailed(e.clone()));
            self.flush_error = Some(e.into());
            return;
        }

        if !self.mirror_stale && same_snapshot(&self.sections, &self.mirror) {
            debug!("{} unchanged, skipping write", document);
            self.emit(EngineEvent::WriteSkipped);
            return;
        }

        info!("Reconciling {} sections of {}", self.sections.len(), document);
        self.enqueue(Job {
            write: RemoteWrite::Reconcile {
                document,
                sections: self.sections.clone(),
            },
            rollback: None,
            responder: None,
        });
    }

    // ── Completions ──────────────────────────────────────────────────

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fetched { epoch, result } if epoch == self.epoch => self.on_fetched(result),
            Completion::Written { epoch, result } if epoch == self.epoch => self.on_written(result),
            _ => debug!("Discarding result from a closed session"),
        }
    }

    fn on_fetched(&mut self, result: StoreResult<Vec<Section>>) {
        if self.lifecycle != Lifecycle::Loading {
            return;
        }
        let Some(DocumentRef::Saved(document)) = self.document.clone() else {
            return;
        };
        let waiter = self.load_waiter.take();

        match result {
            Ok(mut rows) => {
                sort_by_order(&mut rows);
                info!("Loaded {} sections for {}", rows.len(), document);
                self.sections = rows.clone();
                self.mirror = rows;
                self.mirror_stale = false;
                self.provisional = false;
                self.last_error = None;
                self.lifecycle = Lifecycle::Active;

                let pruned = self
                    .disclosure
                    .prune_orphans(self.sections.iter().map(|s| &s.id));
                if pruned > 0 {
                    debug!("Pruned {} orphaned disclosure entries", pruned);
                }
                self.write_cache();

                self.emit(EngineEvent::Loaded {
                    sections: self.sections.len(),
                    document,
                });
                if let Some(waiter) = waiter {
                    waiter.send(Ok(()));
                }
            }
            Err(e) => {
                warn!("Loading {} failed: {}", document, e);
                let error = SyncError::Store(e);
                self.lifecycle = Lifecycle::Idle;
                self.last_error = Some(error.to_string());
                self.emit(EngineEvent::LoadFailed {
                    document,
                    error: error.clone(),
                });
                if let Some(waiter) = waiter {
                    waiter.send(Err(error));
                }
            }
        }
    }

    fn on_written(&mut self, result: StoreResult<WriteOutput>) {
        let Some(job) = self.in_flight.take() else {
            return;
        };
        self.cooldown_until = Some(Instant::now() + self.config.cooldown());
        if let Some(id) = job.write.deleted() {
            self.removing.remove(id);
        }

        let result = match (result, job.write.deleted()) {
            (Err(StoreError::NotFound(missing)), Some(id)) if &missing == id => {
                debug!("Section {} was already gone from the store", id);
                Ok(WriteOutput::Applied)
            }
            (result, _) => result,
        };

        match result {
            Ok(output) => {
                job.write.apply_to(&mut self.mirror, &output);
                if let WriteOutput::Reconciled(report) = output {
                    self.mirror_stale = false;
                    self.flush_error = None;
                    info!(
                        "Reconciled: {} inserted, {} updated, {} deleted, {} unchanged",
                        report.inserted, report.updated, report.deleted, report.unchanged
                    );
                    self.emit(EngineEvent::WriteCompleted(report));
                }
                if let Some(responder) = job.responder {
                    responder.send(Ok(()));
                }
            }
            Err(e) => {
                warn!("Remote write failed: {}", e);
                let transient = e.is_transient();
                let error = SyncError::Store(e);
                self.mirror_stale = true;
                self.last_error = Some(error.to_string());

                match job.rollback {
                    Some(rollback) => self.recover(rollback, &error),
                    None => {
                        self.emit(EngineEvent::WriteFailed(error.clone()));
                        self.flush_error = Some(error.clone());
                        if transient && !self.has_waiters() {
                            debug!("Retrying reconcile after {:?}", self.config.debounce());
                            self.debouncer.schedule();
                        }
                    }
                }
                if let Some(responder) = job.responder {
                    responder.send(Err(error));
                }
            }
        }

        self.dispatch_next();
        self.maybe_flush();
    }

    /// Apply the rollback policy to a failed operation
    fn recover(&mut self, rollback: Rollback, error: &SyncError) {
        let operation = rollback.operation();
        let section = rollback.section().clone();
        self.emit(EngineEvent::OperationFailed {
            operation,
            section: section.clone(),
            error: error.clone(),
        });

        match self.config.rollback {
            RollbackPolicy::Revert => {
                rollback.revert(&mut self.sections, &mut self.disclosure);
                self.write_cache();
                debug!("Rolled back {:?} of {}", operation, section);
                self.emit(EngineEvent::RolledBack { operation, section });
            }
            RollbackPolicy::KeepOptimistic => {
                debug!("Keeping {:?} of {}, reconcile scheduled", operation, section);
                self.debouncer.schedule();
            }
        }
    }

    // ── Publication ──────────────────────────────────────────────────

    fn cooling_down(&self) -> bool {
        self.cooldown_until
            .map_or(false, |until| Instant::now() < until)
    }

    /// Someone is blocked on a flush, close or shutdown
    fn has_waiters(&self) -> bool {
        !self.flush_waiters.is_empty()
            || !self.close_waiters.is_empty()
            || self.shutdown_waiter.is_some()
    }

    fn is_settled(&self) -> bool {
        self.in_flight.is_none()
            && self.queue.is_empty()
            && !self.flush_wanted
            && !self.debouncer.is_pending()
    }

    fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Idle => Phase::Idle,
            Lifecycle::Loading => Phase::Loading,
            Lifecycle::Active if self.is_settled() => Phase::Ready,
            Lifecycle::Active => Phase::Saving,
        }
    }

    /// Resolve flush, close and shutdown waiters once nothing is outstanding
    fn settle(&mut self) {
        if !self.is_settled() {
            return;
        }

        let result = match self.flush_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        };
        for waiter in self.flush_waiters.drain(..) {
            let _ = waiter.send(result.clone());
        }

        if !self.close_waiters.is_empty() {
            self.reset();
            for waiter in self.close_waiters.drain(..) {
                let _ = waiter.send(Ok(()));
            }
        }

        if let Some(waiter) = self.shutdown_waiter.take() {
            self.stopped = true;
            let _ = waiter.send(result);
        }
    }

    fn publish(&self) {
        let default_open = self.config.open_by_default;
        let view = EngineView {
            phase: self.phase(),
            document: self.document.clone(),
            sections: self.sections.clone(),
            disclosure: self
                .sections
                .iter()
                .map(|s| (s.id.clone(), self.disclosure.is_open(&s.id, default_open)))
                .collect(),
            provisional: self.provisional,
            removing: self.removing.clone(),
            last_error: self.last_error.clone(),
        };
        self.view.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
