// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

struct FakeTable(HashMap<u32, ProcessInfo>);

impl ProcessTable for FakeTable {
    fn lookup(&self, pid: u32) -> Option<ProcessInfo> {
        self.0.get(&pid).cloned()
    }
}

fn chain(pairs: &[(u32, Option<u32>, &str)]) -> FakeTable {
    FakeTable(
        pairs
            .iter()
            .map(|&(pid, ppid, name)| (pid, ProcessInfo { pid, ppid, name: name.to_string() }))
            .collect(),
    )
}

#[test]
fn finds_owner_two_hops_up() {
    let table = chain(&[(3, Some(2), "zsh"), (2, Some(1), "tmux"), (1, None, "Terminal")]);
    let owner = resolve_ancestor_pid(&table, 3, |info| info.name == "Terminal");
    assert_eq!(owner, Some(1));
}

#[test]
fn returns_start_pid_when_it_already_owns_a_window() {
    let table = chain(&[(1, None, "Terminal")]);
    assert_eq!(resolve_ancestor_pid(&table, 1, |info| info.name == "Terminal"), Some(1));
}

#[test]
fn gives_up_when_chain_ends_without_a_match() {
    let table = chain(&[(3, Some(2), "zsh"), (2, None, "launchd")]);
    assert_eq!(resolve_ancestor_pid(&table, 3, |info| info.name == "Terminal"), None);
}

#[test]
fn gives_up_at_depth_cap_on_a_cyclic_or_very_long_chain() {
    let pairs: Vec<(u32, Option<u32>, &str)> =
        (0..20).map(|i| (i, Some(i + 1), "shell")).collect();
    let table = chain(&pairs);
    assert_eq!(resolve_ancestor_pid(&table, 0, |info| info.name == "Terminal"), None);
}
