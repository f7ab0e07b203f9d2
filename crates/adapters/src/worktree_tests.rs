// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_porcelain_worktree_list() {
    let raw = "worktree /repo\nHEAD abc123\nbranch refs/heads/main\n\nworktree /repo/.worktrees/feat\nHEAD def456\nbranch refs/heads/feat\n\n";
    let entries = parse_porcelain(raw);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].branch, "main");
    assert_eq!(entries[1].branch, "feat");
}

#[tokio::test]
async fn fake_adapter_create_then_list_then_remove() {
    let adapter = FakeWorktreeAdapter::new();
    adapter.create(Path::new("/repo"), "feat", None).await.expect("create");
    assert_eq!(adapter.list(Path::new("/repo")).await.expect("list").len(), 1);
    adapter.remove(Path::new("/repo"), "feat").await.expect("remove");
    assert!(adapter.list(Path::new("/repo")).await.expect("list").is_empty());
}

#[tokio::test]
async fn fake_adapter_fail_next_create_triggers_once() {
    let adapter = FakeWorktreeAdapter::new();
    adapter.fail_next_create();
    assert!(adapter.create(Path::new("/repo"), "feat", None).await.is_err());
    assert!(adapter.create(Path::new("/repo"), "feat", None).await.is_ok());
}
