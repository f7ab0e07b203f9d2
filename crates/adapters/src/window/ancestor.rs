// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Walks a process's parent chain to find the window-owning ancestor of a
//! console-hosted terminal process:
//! a `CONPTY:<pid>` or `PID:<pid>` key often names a shell or wrapper
//! process, not the terminal emulator that actually owns a top-level
//! window, so adapters walk upward until they find one, or give up.

use std::process::Command;

/// Maximum number of parent hops to walk before giving up.
pub const ANCESTOR_WALK_DEPTH: usize = 8;

/// A single entry in a process's ancestor chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub ppid: Option<u32>,
    pub name: String,
}

/// Source of process-table lookups, abstracted so platform adapters can
/// share the walking logic in [`resolve_ancestor_pid`] while supplying
/// their own OS-specific lookup (`ps`, `/proc`, `tasklist`, a Win32 API).
pub trait ProcessTable {
    fn lookup(&self, pid: u32) -> Option<ProcessInfo>;
}

/// Walks up to [`ANCESTOR_WALK_DEPTH`] parents starting at `pid`, calling
/// `is_window_owner` on each candidate. Returns the first pid that
/// satisfies it, or `None` if the chain ends (no more parents) or the
/// depth cap is reached first.
pub fn resolve_ancestor_pid(
    table: &dyn ProcessTable,
    pid: u32,
    is_window_owner: impl Fn(&ProcessInfo) -> bool,
) -> Option<u32> {
    let mut current = pid;
    for _ in 0..ANCESTOR_WALK_DEPTH {
        let info = table.lookup(current)?;
        if is_window_owner(&info) {
            return Some(info.pid);
        }
        current = info.ppid?;
    }
    None
}

/// `ProcessTable` backed by the real OS process list via `ps` (macOS,
/// Linux). Windows adapters supply their own implementation instead.
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn lookup(&self, pid: u32) -> Option<ProcessInfo> {
        let output = Command::new("ps")
            .args(["-o", "pid=,ppid=,comm=", "-p", &pid.to_string()])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let line = String::from_utf8_lossy(&output.stdout);
        let mut fields = line.trim().splitn(3, char::is_whitespace);
        let pid = fields.next()?.trim().parse().ok()?;
        let ppid = fields.next()?.trim().parse().ok();
        let name = fields.next().unwrap_or_default().trim().to_string();
        Some(ProcessInfo { pid, ppid, name })
    }
}

#[cfg(test)]
#[path = "ancestor_tests.rs"]
mod tests;
