// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn noop_launcher_always_fails_unsupported() {
    let result = NoopSessionLauncher.launch(Path::new("/tmp"), None, None, false).await;
    assert_eq!(result, Err(LauncherError::Unsupported));
}

#[tokio::test]
async fn fake_launcher_records_calls_and_can_fail_once() {
    let launcher = FakeSessionLauncher::new();
    launcher.fail_next_launch();
    assert!(launcher.launch(Path::new("/tmp"), None, None, true).await.is_err());
    assert!(launcher.launch(Path::new("/tmp"), None, None, true).await.is_ok());
    assert_eq!(launcher.calls().len(), 2);
}
