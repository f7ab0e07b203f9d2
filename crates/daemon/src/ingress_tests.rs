// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use corral_adapters::window::fake::FakeWindowAdapter;
use corral_core::FakeClock;
use corral_registry::reap::fake::{FakeProcessChecker, FakeTranscriptChecker};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

async fn spawn_registry() -> RegistryHandle {
    let (handle, mut events) = corral_registry::registry::spawn(
        FakeClock::new(),
        Duration::from_secs(300),
        Duration::from_secs(300),
        Duration::from_secs(30),
        Arc::new(FakeProcessChecker::new()),
        Arc::new(FakeTranscriptChecker::new()),
    );
    tokio::spawn(async move { while events.recv().await.is_some() {} });
    handle
}

#[tokio::test]
async fn a_valid_line_reaches_the_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ingress.sock");
    let listener = bind(&path).await.expect("bind");
    let registry = spawn_registry().await;
    tokio::spawn(serve(listener, registry.clone()));

    let mut stream = UnixStream::connect(&path).await.expect("connect");
    stream
        .write_all(b"{\"event\":\"session_start\",\"session_id\":\"s1\",\"terminal_key\":\"PID:1\"}\n")
        .await
        .expect("write");
    stream.shutdown().await.ok();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let sessions = registry.all().await.expect("all");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].wire_id, "s1");
}

#[tokio::test]
async fn malformed_line_does_not_close_the_connection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ingress.sock");
    let listener = bind(&path).await.expect("bind");
    let registry = spawn_registry().await;
    tokio::spawn(serve(listener, registry.clone()));

    let mut stream = UnixStream::connect(&path).await.expect("connect");
    stream.write_all(b"not json\n").await.expect("write");
    stream
        .write_all(b"{\"event\":\"session_start\",\"session_id\":\"s2\",\"terminal_key\":\"PID:2\"}\n")
        .await
        .expect("write");
    stream.shutdown().await.ok();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let sessions = registry.all().await.expect("all");
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].wire_id, "s2");
}

#[tokio::test]
async fn rebinding_over_a_stale_socket_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ingress.sock");
    {
        let _leftover = bind(&path).await.expect("first bind");
        // Dropped without unlinking, simulating a crashed daemon.
    }
    assert!(bind(&path).await.is_ok());
}

#[tokio::test]
async fn binding_over_a_live_socket_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ingress.sock");
    let listener = bind(&path).await.expect("first bind");
    let _keep_alive = tokio::spawn(async move {
        let _ = listener.accept().await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(matches!(bind(&path).await, Err(DaemonError::IngressSocketInUse(_))));
}
