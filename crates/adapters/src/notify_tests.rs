// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_adapter_always_succeeds() {
    assert!(NoopNotifyAdapter.notify("t", "m").await.is_ok());
}

#[tokio::test]
async fn fake_adapter_records_calls() {
    let adapter = FakeNotifyAdapter::new();
    adapter.notify("handoff ready", "session abc").await.unwrap();
    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].title, "handoff ready");
    assert_eq!(calls[0].message, "session abc");
}
