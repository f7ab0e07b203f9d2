// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The focus watcher (C4): polls the window adapter for whichever
//! terminal window is currently frontmost and correlates it against live
//! sessions, posting `set_focus` to the registry on change.

use crate::registry::RegistryHandle;
use corral_adapters::window::WindowAdapter;
use corral_core::TerminalKey;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Matches frontmost-candidate terminal keys against a session's recorded
/// key, ignoring the `DISCOVERED:` startup-scan prefix on either side —
/// a live `session_start` key and a watcher-reported candidate describe
/// the same OS window regardless of which one was discovered later.
fn matches(candidate: &TerminalKey, recorded: &TerminalKey) -> bool {
    candidate.stripped() == recorded.stripped()
}

/// Spawns the focus-watcher poll loop. Returns the task handle so the
/// daemon can abort it during shutdown.
pub fn spawn<W>(window_adapter: Arc<W>, registry: RegistryHandle, poll_interval: Duration) -> tokio::task::JoinHandle<()>
where
    W: WindowAdapter + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        loop {
            ticker.tick().await;

            let candidates = window_adapter.frontmost_candidates().await;
            if candidates.is_empty() {
                continue;
            }

            let sessions = match registry.all().await {
                Ok(sessions) => sessions,
                Err(e) => {
                    tracing::warn!(error = %e, "focus watcher could not read live sessions");
                    continue;
                }
            };
            if sessions.is_empty() {
                continue;
            }

            let matched = candidates
                .iter()
                .find_map(|candidate| sessions.iter().find(|s| matches(candidate, &s.terminal_key)));

            if let Some(session) = matched {
                if let Err(e) = registry.set_focus(Some(session.id.clone())).await {
                    tracing::warn!(error = %e, "focus watcher could not update focus");
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "focus_tests.rs"]
mod tests;
