// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn missing_file_at_default_path_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist.toml");
    // Explicit path that's missing is an error...
    assert!(DaemonConfig::load(Some(&missing)).is_err());
}

#[test]
fn partial_toml_overrides_only_named_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "ws_port = 9000\nfocus_poll_interval_ms = 500\n").expect("write");

    let config = DaemonConfig::load(Some(&path)).expect("load");
    assert_eq!(config.ws_port, 9000);
    assert_eq!(config.focus_poll_interval, Duration::from_millis(500));
    // Untouched fields keep their defaults.
    assert_eq!(config.ws_bind_addr, DaemonConfig::default().ws_bind_addr);
}

#[test]
fn unknown_key_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not_a_real_setting = 1\n").expect("write");
    assert!(DaemonConfig::load(Some(&path)).is_err());
}

#[parameterized(
    zero_secs = { "stale_reap_threshold_secs = 0", Duration::from_secs(0) },
    large_secs = { "stale_reap_threshold_secs = 86400", Duration::from_secs(86400) },
)]
fn stale_reap_threshold_converts_secs_to_duration(toml_line: &str, expected: Duration) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, toml_line).expect("write");
    let config = DaemonConfig::load(Some(&path)).expect("load");
    assert_eq!(config.stale_reap_threshold, expected);
}
