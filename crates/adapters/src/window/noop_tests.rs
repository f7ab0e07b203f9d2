// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn reports_unsupported_for_placement() {
    let adapter = NoopWindowAdapter;
    let key = TerminalKey::new("PID:1");
    assert_eq!(
        adapter.position_window(&key, Rect::new(0, 0, 10, 10)).await,
        Err(WindowAdapterError::Unsupported)
    );
    assert_eq!(adapter.get_window_bounds(&key).await, Ok(None));
    assert!(adapter.frontmost_candidates().await.is_empty());
    assert!(!adapter.supports_window_bounds());
}
