// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_adapters::window::fake::FakeWindowAdapter;
use corral_adapters::window::NoopWindowAdapter;
use corral_core::FakeClock;
use std::sync::atomic::{AtomicBool, Ordering};

const WORK_AREA: Rect = Rect::new(0, 23, 1920, 1057);

fn candidate(id: &str, key: &str) -> TileCandidate {
    TileCandidate { session_id: SessionId::from_string(id), terminal_key: TerminalKey::new(key) }
}

fn spawn_test<W: WindowAdapter + 'static>(adapter: W, alive: Arc<AtomicBool>) -> TileStateHandle {
    spawn(FakeClock::new(), Arc::new(adapter), move |_| alive.load(Ordering::SeqCst))
}

#[tokio::test]
async fn build_from_manual_tile_assigns_slots_in_order() {
    let handle = spawn_test(FakeWindowAdapter::new(), Arc::new(AtomicBool::new(true)));
    let sessions = vec![candidate("sess-a", "PID:1"), candidate("sess-b", "PID:2")];
    let state = handle.build_from_manual_tile(DisplayId(0), WORK_AREA, sessions).await.unwrap();

    assert_eq!(state.slots.len(), 2);
    assert_eq!(state.slots[0].session_id, SessionId::from_string("sess-a"));
    assert_eq!(state.slots[1].session_id, SessionId::from_string("sess-b"));
    assert!(state.is_consistent());
}

#[tokio::test]
async fn remove_session_compacts_remaining_sessions_onto_smaller_grid() {
    let handle = spawn_test(FakeWindowAdapter::new(), Arc::new(AtomicBool::new(true)));
    let sessions = vec![candidate("sess-a", "PID:1"), candidate("sess-b", "PID:2"), candidate("sess-c", "PID:3")];
    handle.build_from_manual_tile(DisplayId(0), WORK_AREA, sessions).await.unwrap();

    handle.remove_session(SessionId::from_string("sess-b")).await.unwrap();

    let state = handle.get(DisplayId(0)).await.unwrap().unwrap();
    assert_eq!(state.slots.len(), 2);
    assert_eq!(state.columns_per_row, vec![2]);
    let ids: Vec<_> = state.slots.iter().map(|s| s.session_id.as_str().to_string()).collect();
    assert_eq!(ids, vec!["sess-a".to_string(), "sess-c".to_string()]);
}

#[tokio::test]
async fn remove_session_clears_state_when_last_slot_removed() {
    let handle = spawn_test(FakeWindowAdapter::new(), Arc::new(AtomicBool::new(true)));
    handle.build_from_manual_tile(DisplayId(0), WORK_AREA, vec![candidate("sess-a", "PID:1")]).await.unwrap();

    handle.remove_session(SessionId::from_string("sess-a")).await.unwrap();

    assert!(handle.get(DisplayId(0)).await.unwrap().is_none());
}

#[tokio::test]
async fn clear_and_clear_all_remove_state() {
    let handle = spawn_test(FakeWindowAdapter::new(), Arc::new(AtomicBool::new(true)));
    handle.build_from_manual_tile(DisplayId(0), WORK_AREA, vec![candidate("sess-a", "PID:1")]).await.unwrap();
    handle.build_from_manual_tile(DisplayId(1), WORK_AREA, vec![candidate("sess-b", "PID:2")]).await.unwrap();

    handle.clear(DisplayId(0)).await.unwrap();
    assert!(handle.get(DisplayId(0)).await.unwrap().is_none());
    assert!(handle.get(DisplayId(1)).await.unwrap().is_some());

    handle.clear_all().await.unwrap();
    assert!(handle.any().await.unwrap().is_none());
}

#[tokio::test]
async fn bounds_based_validation_accepts_small_drift_and_rejects_large() {
    let adapter = FakeWindowAdapter::new();
    let handle_adapter = adapter.clone();
    let handle = spawn_test(adapter, Arc::new(AtomicBool::new(true)));

    let state = handle
        .build_from_manual_tile(DisplayId(0), WORK_AREA, vec![candidate("sess-a", "PID:1")])
        .await
        .unwrap();
    let slot = &state.slots[0];

    let drifted = Rect::new(slot.rect.x + 10, slot.rect.y, slot.rect.width, slot.rect.height);
    handle_adapter.place_window(slot.terminal_key.clone(), drifted);
    assert!(handle.validate(DisplayId(0)).await.unwrap());

    let moved = Rect::new(slot.rect.x + 500, slot.rect.y, slot.rect.width, slot.rect.height);
    handle_adapter.place_window(slot.terminal_key.clone(), moved);
    assert!(!handle.validate(DisplayId(0)).await.unwrap());
}

#[tokio::test]
async fn existence_based_validation_fails_when_session_is_gone() {
    let alive = Arc::new(AtomicBool::new(true));
    let handle = spawn_test(NoopWindowAdapter, alive.clone());

    handle.build_from_manual_tile(DisplayId(0), WORK_AREA, vec![candidate("sess-a", "PID:1")]).await.unwrap();
    assert!(handle.validate(DisplayId(0)).await.unwrap());

    alive.store(false, Ordering::SeqCst);
    assert!(!handle.validate(DisplayId(0)).await.unwrap());
}

#[tokio::test]
async fn validate_on_unknown_display_is_trivially_true() {
    let handle = spawn_test(FakeWindowAdapter::new(), Arc::new(AtomicBool::new(true)));
    assert!(handle.validate(DisplayId(99)).await.unwrap());
}
