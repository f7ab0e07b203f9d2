// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness probes the registry's reaping timers consult. Split into two
//! small traits, each with a real OS-backed implementation and a fake for
//! tests, the same shape as
//! `corral_adapters::window::ancestor::ProcessTable`.

use std::fs;
use std::path::Path;

/// Tells the registry whether the process that hosts a session (its
/// `terminal_key`'s encoded PID) is still alive.
pub trait ProcessChecker: Send + Sync {
    fn is_alive(&self, pid: u32) -> bool;
}

/// Real process-liveness check via `kill(pid, 0)` semantics exposed
/// through `ps`, kept consistent with
/// `corral_adapters::window::ancestor::SystemProcessTable`'s choice to
/// shell out rather than link a process-inspection crate.
pub struct SystemProcessChecker;

impl ProcessChecker for SystemProcessChecker {
    fn is_alive(&self, pid: u32) -> bool {
        std::process::Command::new("ps")
            .args(["-p", &pid.to_string()])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Tells the registry how recently a session's transcript file was
/// written to, for the stale-cleanup timer.
pub trait TranscriptChecker: Send + Sync {
    /// Returns the file's modified time as epoch milliseconds, or `None`
    /// if it cannot be read (missing file, permissions).
    fn mtime_epoch_ms(&self, path: &str) -> Option<u64>;
}

pub struct SystemTranscriptChecker;

impl TranscriptChecker for SystemTranscriptChecker {
    fn mtime_epoch_ms(&self, path: &str) -> Option<u64> {
        let modified = fs::metadata(Path::new(path)).ok()?.modified().ok()?;
        modified.duration_since(std::time::UNIX_EPOCH).ok().map(|d| d.as_millis() as u64)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::{ProcessChecker, TranscriptChecker};
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct FakeProcessChecker {
        alive: Mutex<HashMap<u32, bool>>,
    }

    impl FakeProcessChecker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Unlisted PIDs are considered alive, so tests only need to name
        /// the process they want to kill.
        pub fn kill(&self, pid: u32) {
            self.alive.lock().insert(pid, false);
        }
    }

    impl ProcessChecker for FakeProcessChecker {
        fn is_alive(&self, pid: u32) -> bool {
            *self.alive.lock().get(&pid).unwrap_or(&true)
        }
    }

    #[derive(Default)]
    pub struct FakeTranscriptChecker {
        mtimes: Mutex<HashMap<String, u64>>,
    }

    impl FakeTranscriptChecker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_mtime(&self, path: impl Into<String>, epoch_ms: u64) {
            self.mtimes.lock().insert(path.into(), epoch_ms);
        }
    }

    impl TranscriptChecker for FakeTranscriptChecker {
        fn mtime_epoch_ms(&self, path: &str) -> Option<u64> {
            self.mtimes.lock().get(path).copied()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessChecker, FakeTranscriptChecker};
