//! Scenario 1 (spec.md §8): a subscriber connected before any event
//! observes the session's full lifecycle as a sequence of
//! `session_update`s with the expected status progression, then
//! `session_removed` once the process reports `session_end`.

use crate::prelude::{unique_session_id, CorralDaemon, HubClient};
use corral_core::SessionStatus;
use corral_wire::ServerMessage;

#[tokio::test]
async fn happy_path_session_lifecycle_is_observed_in_order() {
    let daemon = CorralDaemon::start().await;
    let mut subscriber = HubClient::connect(&daemon).await;

    // First message on any connection is `initial_state`; no sessions
    // exist yet.
    match subscriber.next_message().await {
        ServerMessage::InitialState { sessions, .. } => assert!(sessions.is_empty()),
        other => panic!("expected initial_state, got {other:?}"),
    }

    let wire_id = unique_session_id("s");
    daemon
        .send_ingress_line(&format!(
            r#"{{"event":"session_start","session_id":"{wire_id}","terminal_key":"PID:1234","cwd":"/p"}}"#
        ))
        .await;
    daemon.send_ingress_line(&format!(r#"{{"event":"tool_use_start","session_id":"{wire_id}","tool_name":"Bash"}}"#)).await;
    daemon.send_ingress_line(&format!(r#"{{"event":"tool_use_end","session_id":"{wire_id}"}}"#)).await;
    daemon
        .send_ingress_line(&format!(r#"{{"event":"assistant_response_complete","session_id":"{wire_id}"}}"#))
        .await;
    daemon.send_ingress_line(&format!(r#"{{"event":"session_end","session_id":"{wire_id}"}}"#)).await;

    let expected_statuses =
        [SessionStatus::Active, SessionStatus::Working, SessionStatus::Idle, SessionStatus::Idle];

    for expected in expected_statuses {
        match subscriber.next_message().await {
            ServerMessage::SessionUpdate { session } => {
                assert_eq!(session.wire_id, wire_id);
                assert_eq!(session.status, expected);
            }
            other => panic!("expected session_update, got {other:?}"),
        }
    }

    match subscriber.next_message().await {
        ServerMessage::SessionRemoved { session_id } => {
            // The removed id is the server-assigned SessionId, correlated
            // via the session_update records already observed above.
            assert!(session_id.as_str().starts_with("sess-"));
        }
        other => panic!("expected session_removed, got {other:?}"),
    }
}

#[tokio::test]
async fn a_second_subscriber_gets_the_live_session_in_its_initial_state() {
    let daemon = CorralDaemon::start().await;
    let wire_id = unique_session_id("s");
    daemon
        .send_ingress_line(&format!(
            r#"{{"event":"session_start","session_id":"{wire_id}","terminal_key":"PID:9999","cwd":"/p"}}"#
        ))
        .await;

    // Give the registry a moment to process the ingress line before the
    // next connection's initial_state is computed.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let mut subscriber = HubClient::connect(&daemon).await;
    match subscriber.next_message().await {
        ServerMessage::InitialState { sessions, .. } => {
            assert!(sessions.iter().any(|s| s.wire_id == wire_id));
        }
        other => panic!("expected initial_state, got {other:?}"),
    }
}
