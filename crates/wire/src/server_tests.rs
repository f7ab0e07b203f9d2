// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_core::test_support::SessionBuilder;
use corral_core::SystemClock;

#[test]
fn initial_state_serializes_with_type_tag() {
    let message = ServerMessage::InitialState { sessions: vec![], focused_session_id: None };
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["type"], "initial_state");
    assert!(json.get("focused_session_id").is_none());
}

#[test]
fn session_update_round_trips_a_real_session() {
    let session = SessionBuilder::new(&SystemClock, "wire-1").terminal_key("PID:1").build();
    let message = ServerMessage::SessionUpdate { session: session.clone() };
    let json = serde_json::to_string(&message).unwrap();
    let parsed: ServerMessage = serde_json::from_str(&json).unwrap();
    match parsed {
        ServerMessage::SessionUpdate { session: parsed_session } => {
            assert_eq!(parsed_session.id, session.id);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn smart_tile_add_result_omits_none_fields() {
    let message = ServerMessage::SmartTileAddResult {
        success: true,
        repositioned: 2,
        total_tiled: 4,
        used_free_space: false,
        launch_method: None,
        error: None,
    };
    let json = serde_json::to_value(&message).unwrap();
    assert!(json.get("launch_method").is_none());
    assert!(json.get("error").is_none());
}
