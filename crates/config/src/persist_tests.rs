// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn autocompact_defaults_true_when_file_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = AutocompactStore::new(dir.path().join("settings.json"));
    assert!(store.read().expect("read").enabled);
}

#[test]
fn autocompact_write_preserves_unrelated_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"someOtherSetting": 42, "autoCompact": true}"#).expect("seed");

    let store = AutocompactStore::new(path.clone());
    store.write(AutocompactSettings { enabled: false }).expect("write");

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).unwrap();
    assert_eq!(raw["someOtherSetting"], 42);
    assert_eq!(raw["autoCompact"], false);
}

#[test]
fn autocompact_round_trips_through_write_then_read() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = AutocompactStore::new(dir.path().join("settings.json"));
    store.write(AutocompactSettings { enabled: false }).expect("write");
    assert!(!store.read().expect("read").enabled);
}

#[test]
fn notification_settings_default_when_file_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = NotificationStore::new(dir.path().join("notifications.json"));
    assert_eq!(store.read().expect("read"), NotificationSettings::default());
}

#[test]
fn notification_settings_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = NotificationStore::new(dir.path().join("notifications.json"));
    let settings = NotificationSettings { handoff_ready: false, awaiting_approval: false, session_ended: true };
    store.write(settings).expect("write");
    assert_eq!(store.read().expect("read"), settings);
}

#[test]
fn no_tmp_file_survives_a_successful_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = NotificationStore::new(dir.path().join("notifications.json"));
    store.write(NotificationSettings::default()).expect("write");
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}
