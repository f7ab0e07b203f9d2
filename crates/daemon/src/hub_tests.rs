// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_core::test_support::SessionBuilder;
use corral_core::SystemClock;

fn session(id: &str) -> Session {
    SessionBuilder::new(&SystemClock, id).terminal_key("PID:1").build()
}

#[test]
fn undroppable_kinds_are_never_coalesced_away() {
    let mut queue = OutboundQueue::new(1);
    let first = ServerMessage::SessionRemoved { session_id: session("a").id };
    assert!(queue.push(first));
    let second = ServerMessage::SessionRemoved { session_id: session("b").id };
    // Queue is full of an undroppable message and this one is also
    // undroppable with nothing to coalesce against: disconnect.
    assert!(!queue.push(second));
}

#[test]
fn older_session_update_for_same_session_is_dropped_first() {
    let mut queue = OutboundQueue::new(1);
    let s = session("a");
    assert!(queue.push(ServerMessage::SessionUpdate { session: s.clone() }));
    assert!(queue.push(ServerMessage::SessionUpdate { session: s.clone() }));
    let drained = queue.drain();
    assert_eq!(drained.len(), 1);
}

#[test]
fn telemetry_is_dropped_before_disconnecting_for_undroppable() {
    let mut queue = OutboundQueue::new(1);
    let s = session("a");
    assert!(queue.push(ServerMessage::ApiLog { payload: serde_json::json!({}) }));
    assert!(queue.push(ServerMessage::SessionRemoved { session_id: s.id }));
    let drained = queue.drain();
    assert_eq!(drained.len(), 1);
    assert!(matches!(drained[0], ServerMessage::SessionRemoved { .. }));
}

#[test]
fn queue_under_capacity_keeps_every_message() {
    let mut queue = OutboundQueue::new(4);
    for i in 0..3 {
        assert!(queue.push(ServerMessage::ApiLog { payload: serde_json::json!(i) }));
    }
    assert_eq!(queue.drain().len(), 3);
}
