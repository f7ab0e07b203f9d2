// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handoff watcher: watches a predetermined
//! relative path beneath each known project directory and fires a single
//! `handoff_ready` callback the first time it appears or changes after
//! the watch starts, coalescing further changes within a debounce window.

use corral_core::SessionId;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

/// Minimum coalescing window between fires for the same path.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum HandoffWatchError {
    #[error("failed to start filesystem watch on {path}: {source}")]
    WatchFailed { path: PathBuf, source: notify::Error },
}

/// One fired handoff event, delivered to whatever consumes
/// [`HandoffWatcher::subscribe`]'s receiver (the daemon orchestrator,
/// which relays it to the subscription hub as `handoff_ready`).
#[derive(Debug, Clone)]
pub struct HandoffReady {
    pub session_id: SessionId,
    pub path: PathBuf,
}

struct Watch {
    _watcher: RecommendedWatcher,
}

/// Owns one filesystem watch per project path currently being tracked.
/// Start/stop are explicit: stopping a watch releases its OS resources
/// immediately rather than waiting for the watcher to be dropped.
pub struct HandoffWatcher {
    watches: Mutex<HashMap<PathBuf, Watch>>,
    sender: mpsc::UnboundedSender<HandoffReady>,
}

impl HandoffWatcher {
    /// Creates a watcher and returns it alongside the receiving end of its
    /// fire channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HandoffReady>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { watches: Mutex::new(HashMap::new()), sender }, receiver)
    }

    /// Starts watching `project_root.join(relative_handoff_path)` for the
    /// given `session_id`. Calling this again for the same resolved path
    /// while a watch is already active is a no-op (idempotent start).
    pub fn watch(
        &self,
        session_id: SessionId,
        project_root: &Path,
        relative_handoff_path: &Path,
    ) -> Result<(), HandoffWatchError> {
        let target = project_root.join(relative_handoff_path);
        let key = target.clone();

        if self.watches.lock().contains_key(&key) {
            return Ok(());
        }

        let sender = self.sender.clone();
        let session_id_for_handler = session_id;
        let target_for_handler = target.clone();
        let fired_guard: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
        let fired_guard_for_handler = fired_guard.clone();

        let watch_dir = target.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            if !event.paths.iter().any(|p| p == &target_for_handler) {
                return;
            }

            let mut last_fired = fired_guard_for_handler.lock();
            let now = Instant::now();
            if let Some(prev) = *last_fired {
                if now.duration_since(prev) < DEBOUNCE_WINDOW {
                    return;
                }
            }
            *last_fired = Some(now);
            drop(last_fired);

            let _ = sender.send(HandoffReady {
                session_id: session_id_for_handler,
                path: target_for_handler.clone(),
            });
        })
        .map_err(|source| HandoffWatchError::WatchFailed { path: target.clone(), source })?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|source| HandoffWatchError::WatchFailed { path: target.clone(), source })?;

        self.watches.lock().insert(key, Watch { _watcher: watcher });
        Ok(())
    }

    /// Stops watching the given resolved path, releasing the underlying
    /// OS watch descriptor.
    pub fn unwatch(&self, project_root: &Path, relative_handoff_path: &Path) {
        let target = project_root.join(relative_handoff_path);
        self.watches.lock().remove(&target);
    }

    pub fn active_count(&self) -> usize {
        self.watches.lock().len()
    }
}

#[cfg(test)]
#[path = "handoff_tests.rs"]
mod tests;
