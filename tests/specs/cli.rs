//! Black-box specs for `corralctl`, the diagnostic client: every
//! non-watch subcommand sends one request and prints its matching
//! `*_result` reply.

use crate::prelude::{corralctl_binary, CorralDaemon};
use std::process::Command;

#[tokio::test]
async fn toggle_autocompact_reports_the_new_state() {
    let daemon = CorralDaemon::start().await;

    let output = Command::new(corralctl_binary())
        .args(["--addr", daemon.ws_addr(), "--format", "json", "toggle-autocompact", "false"])
        .output()
        .expect("run corralctl");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next().expect("one json line printed");
    let value: serde_json::Value = serde_json::from_str(line).expect("valid json");
    assert_eq!(value["type"], "toggle_autocompact_result");
    assert_eq!(value["enabled"], false);
}

#[tokio::test]
async fn focus_terminal_on_an_unknown_session_reports_failure_not_a_crash() {
    let daemon = CorralDaemon::start().await;

    let output = Command::new(corralctl_binary())
        .args(["--addr", daemon.ws_addr(), "--format", "json", "focus-terminal", "sess-does-not-exist"])
        .output()
        .expect("run corralctl");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.lines().next().expect("one json line printed");
    let value: serde_json::Value = serde_json::from_str(line).expect("valid json");
    assert_eq!(value["type"], "focus_terminal_result");
    assert_eq!(value["success"], false);
}

#[tokio::test]
async fn connecting_to_a_closed_port_fails_cleanly() {
    let output = Command::new(corralctl_binary())
        .args(["--addr", "127.0.0.1:1", "focus-terminal", "sess-x"])
        .output()
        .expect("run corralctl");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("corralctl:"));
}
