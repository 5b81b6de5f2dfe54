//! Debounced reconcile behaviour
//!
//! This tests:
//! - Coalescing bursts of edits into one write
//! - Skipping writes when nothing changed
//! - Renumbering and distinct orders after mixed operations
//! - Edits rejected before they reach the store
//! - Failed reconciles: retry, and refresh held back until the store has them

mod common;

use casework_common::{
    check_orders, Direction, SectionEdit, SectionKind, SectionPayload, ValidationError,
};
use casework_editor::{
    EngineConfig, EngineEvent, Phase, RefreshOutcome, RefreshTrigger, RefusalReason, SyncError,
};
use casework_store::{StoreCall, StoreCallKind, StoreError};
use common::*;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_two_quick_edits_produce_one_write() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;

    harness
        .engine
        .edit(&id("a"), SectionEdit::content("first"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    harness
        .engine
        .edit(&id("a"), SectionEdit::content("second"))
        .await
        .unwrap();

    // 300ms after the first edit the timer has been pushed back
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(harness.writes().await.is_empty());
    assert_eq!(harness.engine.view().phase, Phase::Saving);

    settle().await;
    let writes = harness.writes().await;
    assert_eq!(writes.len(), 1);
    match &writes[0] {
        StoreCall::Update { id: updated, patch } => {
            assert_eq!(updated, &id("a"));
            assert_eq!(patch.content.as_deref(), Some("second"));
        }
        other => panic!("Expected one update, got {:?}", other),
    }
    assert_eq!(harness.engine.view().phase, Phase::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_edit_reverted_before_debounce_skips_write() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;
    let mut events = harness.engine.subscribe();

    harness
        .engine
        .edit(&id("a"), SectionEdit::title("Draft"))
        .await
        .unwrap();
    let original = abc(1)[0].title.clone();
    harness
        .engine
        .edit(&id("a"), SectionEdit::title(original))
        .await
        .unwrap();

    settle().await;
    assert!(harness.store.calls().await.is_empty());
    assert!(drain(&mut events).contains(&EngineEvent::WriteSkipped));
}

#[tokio::test(start_paused = true)]
async fn test_flush_writes_immediately() {
    let harness = Harness::loaded(abc(2), EngineConfig::default()).await;
    let payload = SectionPayload::Alignment {
        items: vec![casework_common::AlignmentItem {
            heading: "Goal".into(),
            body: "Ship it".into(),
        }],
    };
    harness
        .engine
        .edit(
            &id("b"),
            SectionEdit {
                payload: Some(payload.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    harness.engine.flush().await.unwrap();

    assert_eq!(harness.store.get(&id("b")).await.unwrap().payload, payload);
    assert_eq!(harness.engine.view().phase, Phase::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_orders_stay_distinct_after_mixed_operations() {
    let harness = Harness::loaded(abc(3), EngineConfig::default()).await;

    let d = harness.engine.add(SectionKind::Carousel).await.unwrap();
    harness.engine.remove(&id("b")).await.unwrap();
    harness.engine.reorder(&d, Direction::Up).await.unwrap();
    harness.engine.add(SectionKind::Introduction).await.unwrap();
    harness.engine.remove(&id("a")).await.unwrap();
    settle().await;

    let view = harness.engine.view();
    assert_eq!(view.phase, Phase::Ready);
    check_orders(&view.sections).unwrap();
    let orders: Vec<u32> = view.sections.iter().map(|s| s.order).collect();
    assert_eq!(orders, (1..=view.sections.len() as u32).collect::<Vec<_>>());

    // Remote matches local after the reconcile
    assert_eq!(harness.store.snapshot(&doc()).await, view.sections);
}

#[tokio::test(start_paused = true)]
async fn test_removal_gap_closed_by_reconcile() {
    let harness = Harness::loaded(abc(3), EngineConfig::default()).await;

    harness.engine.remove(&id("a")).await.unwrap();
    assert_eq!(harness.orders(), vec![("b".into(), 2), ("c".into(), 3)]);

    settle().await;
    assert_eq!(harness.orders(), vec![("b".into(), 1), ("c".into(), 2)]);
    let stored: Vec<u32> = harness
        .store
        .snapshot(&doc())
        .await
        .iter()
        .map(|s| s.order)
        .collect();
    assert_eq!(stored, vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_kind_change_rejected_locally() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;
    let edit = SectionEdit {
        payload: Some(SectionPayload::default_for(SectionKind::Carousel)),
        ..Default::default()
    };

    let err = harness.engine.edit(&id("a"), edit).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Validation(ValidationError::KindChange { .. })
    ));

    settle().await;
    assert!(harness.store.calls().await.is_empty());
    assert_eq!(harness.engine.view().sections, abc(1));
}

#[tokio::test(start_paused = true)]
async fn test_debounce_interval_follows_config() {
    let config = EngineConfig {
        debounce_ms: 50,
        ..Default::default()
    };
    let harness = Harness::loaded(abc(1), config).await;

    harness
        .engine
        .edit(&id("a"), SectionEdit::content("quick"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(harness.writes().await.len(), 1);
}

async fn stored_content(harness: &Harness, section: &str) -> String {
    harness.store.get(&id(section)).await.unwrap().content
}

#[tokio::test(start_paused = true)]
async fn test_reconcile_failing_in_transit_is_retried() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Transport("offline".into()))
        .await;
    let mut events = harness.engine.subscribe();

    harness
        .engine
        .edit(&id("a"), SectionEdit::content("unsaved words"))
        .await
        .unwrap();

    // First attempt failed at 300ms, the retry is pending
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(harness.engine.view().phase, Phase::Saving);
    assert_eq!(stored_content(&harness, "a").await, "");
    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refused(RefusalReason::Saving)
    );

    settle().await;
    let view = harness.engine.view();
    assert_eq!(view.phase, Phase::Ready);
    assert_eq!(view.sections[0].content, "unsaved words");
    assert_eq!(stored_content(&harness, "a").await, "unsaved words");

    let seen = drain(&mut events);
    assert!(seen
        .iter()
        .any(|e| matches!(e, EngineEvent::WriteFailed(_))));
    assert!(seen
        .iter()
        .any(|e| matches!(e, EngineEvent::WriteCompleted(report) if report.updated == 1)));

    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refreshed
    );
    assert_eq!(harness.engine.view().sections[0].content, "unsaved words");
}

#[tokio::test(start_paused = true)]
async fn test_remote_refresh_keeps_unwritten_edit() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Conflict("stale row".into()))
        .await;
    let mut events = harness.engine.subscribe();

    harness
        .engine
        .edit(&id("a"), SectionEdit::content("unsaved words"))
        .await
        .unwrap();
    settle().await;

    // A conflict is not retried on its own
    let view = harness.engine.view();
    assert_eq!(view.phase, Phase::Ready);
    assert!(view.last_error.is_some());
    assert_eq!(stored_content(&harness, "a").await, "");
    assert!(drain(&mut events).contains(&EngineEvent::WriteFailed(SyncError::Store(
        StoreError::Conflict("stale row".into())
    ))));

    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refused(RefusalReason::Unsynced)
    );
    assert_eq!(harness.engine.view().sections[0].content, "unsaved words");

    // An explicit flush writes it out and lifts the refusal
    harness.engine.flush().await.unwrap();
    assert_eq!(stored_content(&harness, "a").await, "unsaved words");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(
        harness
            .engine
            .refresh(RefreshTrigger::RemoteChanged)
            .await
            .unwrap(),
        RefreshOutcome::Refreshed
    );
    assert_eq!(harness.engine.view().sections[0].content, "unsaved words");
}

#[tokio::test(start_paused = true)]
async fn test_explicit_refresh_discards_unwritten_edit() {
    let harness = Harness::loaded(abc(1), EngineConfig::default()).await;
    harness
        .store
        .fail_next(StoreCallKind::Update, StoreError::Conflict("stale row".into()))
        .await;

    harness
        .engine
        .edit(&id("a"), SectionEdit::content("unsaved words"))
        .await
        .unwrap();
    settle().await;

    assert_eq!(
        harness.engine.refresh(RefreshTrigger::Explicit).await.unwrap(),
        RefreshOutcome::Refreshed
    );
    let view = harness.engine.view();
    assert_eq!(view.phase, Phase::Ready);
    assert_eq!(view.sections[0].content, "");
    assert_eq!(stored_content(&harness, "a").await, "");
}
