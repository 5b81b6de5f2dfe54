//! Section operations through the engine
//!
//! This tests:
//! - add / remove / reorder / publish against the remote call log
//! - Rollback of each operation when its write fails
//! - Deletes of rows that are already gone
//! - Convergence when optimistic changes are kept

mod common;

use casework_common::{SectionKind, SectionPatch};
use casework_editor::{
    EngineConfig, EngineEvent, OperationKind, Phase, RefreshOutcome, RefreshTrigger,
    RollbackPolicy, SyncError,
};
use casework_store::{MemoryStore, RemoteStore, StoreCall, StoreCallKind, StoreError};
use common::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_add_appends_open_section_and_inserts() {
    let harness = Harness::loaded(abc(2), EngineConfig::default()).await;

    let new_id = harness.engine.add(SectionKind::Carousel).await.unwrap();

    let view = harness.engine.view();
    assert_eq!(
        harness.orders(),
        vec![("a".into(), 1), ("b".into(), 2), (new_id.to_string(), 3)]
    );
    assert!(view.is_open(&new_id));
    let added = view.section(&new_id).unwrap().clone();
    assert_eq!(added.kind, SectionKind::Carousel);
    assert!(!added.published);
    assert_eq!(harness.writes().await, vec![StoreCall::Insert(added)]);

    // The debounced flush finds nothing left to write
    settle().await;
    assert_eq!(harness.writes().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reorder_up_issues_two_updates() {
    let harness = Harness::loaded(abc(3), EngineConfig::default()).await;

    assert!(harness
        .engine
        .reorder(&id("b"), casework_common::Direction::Up)
        .await
        .unwrap());

    assert_eq!(
        harness.orders(),
        vec![("b".into(), 1), ("a".into(), 2), ("c".into(), 3)]
    );
    assert_eq!(
        harness.writes().await,
        vec![
            StoreCall::Update {
                id: id("b"),
                patch: SectionPatch::order(1)
            },
            StoreCall::Update {
                id: id("a"),
                patch: SectionPatch::order(2)
            },
        ]
    );

    settle().await;
    assert_eq!(harness.writes().await.len(), 2);
    let stored: Vec<_> = harness
        .store
        .snapshot(&doc())
        .await
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(stored, vec![id("b"), id("a"), id("c")]);
}

#[tokio::test(start_paused = true)]
async fn test_reorder_without_neighbour_makes_no_calls() {
    let harness = Harness::loaded(abc(2), EngineConfig::default()).await;

    assert!(!harness
        .engine
        .reorder(&id("a"), casework_common::Direction::Up)
        .await
        .unwrap());
    assert!(!harness
        .engine
        .reorder(&id("b"), casework_common::Direction::Down)
        .await
        .unwrap());

    settle().await;
    assert!(harness.store.calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_publish_to_current_value_is_a_no_op() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;

    assert!(!harness
        .engine
        .toggle_published(&id("a"), false)
        .await
        .unwrap());
    assert!(harness
        .engine
        .toggle_published(&id("a"), true)
        .await
        .unwrap());
    assert!(!harness
        .engine
        .toggle_published(&id("a"), true)
        .await
        .unwrap());

    assert_eq!(
        harness.writes().await,
        vec![StoreCall::Update {
            id: id("a"),
            patch: SectionPatch::published(true)
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn test_remove_marks_in_progress_until_delete_resolves() {
    let store = casework_store::MemoryStore::with_sections(abc(2))
        .unwrap()
        .with_latency(std::time::Duration::from_millis(200));
    let harness = Harness::new(store, EngineConfig::default());
    harness.engine.start(doc()).await.unwrap();

    let engine = harness.engine.clone();
    let remove = tokio::spawn(async move { engine.remove(&id("a")).await });

    let mut watch = harness.engine.watch();
    let during = watch
        .wait_for(|v| v.removing.contains(&id("a")))
        .await
        .unwrap()
        .clone();
    assert!(during.section(&id("a")).is_none());

    remove.await.unwrap().unwrap();
    assert!(harness.engine.view().removing.is_empty());
    assert!(harness.store.get(&id("a")).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_section_is_rejected() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;

    assert_eq!(
        harness.engine.remove(&id("ghost")).await.unwrap_err(),
        SyncError::UnknownSection(id("ghost"))
    );
    assert_eq!(
        harness
            .engine
            .toggle_published(&id("ghost"), true)
            .await
            .unwrap_err(),
        SyncError::UnknownSection(id("ghost"))
    );
    assert!(harness.store.calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_publish_reverts_and_reports() {
    let harness = Harness::loaded(
        vec![section("a", SectionKind::Introduction, 1).with_published(true)],
        EngineConfig::default(),
    )
    .await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Transport("offline".into()))
        .await;
    let mut events = harness.engine.subscribe();

    let err = harness
        .engine
        .toggle_published(&id("a"), false)
        .await
        .unwrap_err();
    assert_eq!(err, SyncError::Store(StoreError::Transport("offline".into())));

    let view = harness.engine.view();
    assert!(view.section(&id("a")).unwrap().published);
    assert!(view.last_error.is_some());

    let seen = drain(&mut events);
    assert!(seen.contains(&EngineEvent::OperationFailed {
        operation: OperationKind::Publish,
        section: id("a"),
        error: err.clone(),
    }));
    assert!(seen.contains(&EngineEvent::RolledBack {
        operation: OperationKind::Publish,
        section: id("a"),
    }));

    // The stale mirror is reconciled, which finds local and remote equal
    settle().await;
    assert!(harness.store.get(&id("a")).await.unwrap().published);
}

#[tokio::test(start_paused = true)]
async fn test_failed_add_is_removed_again() {
    let harness = Harness::loaded(abc(2), EngineConfig::default()).await;
    harness
        .store
        .fail_next(StoreCallKind::Insert, StoreError::Conflict("taken".into()))
        .await;

    let err = harness.engine.add(SectionKind::Alignment).await.unwrap_err();
    assert!(matches!(err, SyncError::Store(StoreError::Conflict(_))));

    let view = harness.engine.view();
    assert_eq!(view.ids(), vec![id("a"), id("b")]);
    assert_eq!(view.disclosure.len(), 2);

    settle().await;
    assert_eq!(harness.store.snapshot(&doc()).await, abc(2));
}

#[tokio::test(start_paused = true)]
async fn test_failed_remove_restores_position() {
    let harness = Harness::loaded(abc(3), EngineConfig::default()).await;
    harness.engine.toggle_disclosure(&id("b")).await.unwrap();
    harness
        .store
        .fail_next(StoreCallKind::Delete, StoreError::Transport("reset".into()))
        .await;

    assert!(harness.engine.remove(&id("b")).await.is_err());

    let view = harness.engine.view();
    assert_eq!(view.ids(), vec![id("a"), id("b"), id("c")]);
    assert!(view.is_open(&id("b")));
    assert!(view.removing.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_reorder_restores_orders() {
    let harness = Harness::loaded(abc(3), EngineConfig::default()).await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Transport("reset".into()))
        .await;

    assert!(harness
        .engine
        .reorder(&id("c"), casework_common::Direction::Up)
        .await
        .is_err());
    assert_eq!(
        harness.orders(),
        vec![("a".into(), 1), ("b".into(), 2), ("c".into(), 3)]
    );

    settle().await;
    let stored: Vec<u32> = harness
        .store
        .snapshot(&doc())
        .await
        .iter()
        .map(|s| s.order)
        .collect();
    assert_eq!(stored, vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn test_kept_optimistic_change_converges() {
    let config = EngineConfig::default().with_rollback(RollbackPolicy::KeepOptimistic);
    let harness = Harness::loaded(abc(2), config).await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Transport("offline".into()))
        .await;
    let mut events = harness.engine.subscribe();

    assert!(harness
        .engine
        .toggle_published(&id("b"), true)
        .await
        .is_err());
    assert!(harness.engine.view().section(&id("b")).unwrap().published);
    assert!(!harness.store.get(&id("b")).await.unwrap().published);

    settle().await;

    assert!(harness.store.get(&id("b")).await.unwrap().published);
    let seen = drain(&mut events);
    assert!(!seen
        .iter()
        .any(|e| matches!(e, EngineEvent::RolledBack { .. })));
    assert!(seen
        .iter()
        .any(|e| matches!(e, EngineEvent::WriteCompleted(report) if report.updated == 1)));
}

#[tokio::test(start_paused = true)]
async fn test_kept_optimistic_add_is_inserted_by_reconcile() {
    let config = EngineConfig::default().with_rollback(RollbackPolicy::KeepOptimistic);
    let harness = Harness::loaded(abc(1), config).await;
    harness
        .store
        .fail_next(StoreCallKind::Insert, StoreError::Transport("offline".into()))
        .await;

    assert!(harness.engine.add(SectionKind::Carousel).await.is_err());
    assert_eq!(harness.engine.view().sections.len(), 2);

    harness.engine.flush().await.unwrap();
    assert_eq!(harness.store.snapshot(&doc()).await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_removing_section_deleted_elsewhere_succeeds() {
    let harness = Harness::loaded(abc(2), EngineConfig::default()).await;
    harness.store.delete(&id("b")).await.unwrap();
    let mut events = harness.engine.subscribe();

    harness.engine.remove(&id("b")).await.unwrap();
    settle().await;

    let view = harness.engine.view();
    assert_eq!(view.ids(), vec![id("a")]);
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.removing.is_empty());
    assert_eq!(harness.store.snapshot(&doc()).await, abc(1));

    let seen = drain(&mut events);
    assert!(!seen.iter().any(|e| matches!(
        e,
        EngineEvent::OperationFailed { .. } | EngineEvent::RolledBack { .. }
    )));

    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refreshed
    );
    assert_eq!(harness.engine.view().ids(), vec![id("a")]);
}

#[tokio::test(start_paused = true)]
async fn test_section_removed_before_failed_insert_stays_removed() {
    let store = MemoryStore::with_sections(abc(1))
        .unwrap()
        .with_latency(Duration::from_millis(100));
    let harness = Harness::new(store, EngineConfig::default());
    harness.engine.start(doc()).await.unwrap();
    harness
        .store
        .fail_next(StoreCallKind::Insert, StoreError::Transport("offline".into()))
        .await;

    let engine = harness.engine.clone();
    let add = tokio::spawn(async move { engine.add(SectionKind::Carousel).await });
    let mut watch = harness.engine.watch();
    let new_id = watch
        .wait_for(|v| v.sections.len() == 2)
        .await
        .unwrap()
        .sections[1]
        .id
        .clone();

    // The insert is still in flight; its delete queues behind it
    harness.engine.remove(&new_id).await.unwrap();
    assert!(add.await.unwrap().is_err());

    settle().await;
    let view = harness.engine.view();
    assert_eq!(view.ids(), vec![id("a")]);
    assert_eq!(view.phase, Phase::Ready);
    assert!(harness.store.get(&new_id).await.is_none());
    assert_eq!(harness.store.snapshot(&doc()).await, abc(1));

    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refreshed
    );
    assert_eq!(harness.engine.view().ids(), vec![id("a")]);
}
