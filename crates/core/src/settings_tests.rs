// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_enable_handoff_and_approval_but_not_session_ended() {
    let settings = NotificationSettings::default();
    assert!(settings.handoff_ready);
    assert!(settings.awaiting_approval);
    assert!(!settings.session_ended);
}

#[test]
fn missing_fields_deserialize_to_defaults() {
    let settings: NotificationSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, NotificationSettings::default());
}
