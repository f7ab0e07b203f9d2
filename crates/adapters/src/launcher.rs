// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-emulator launching, an external collaborator per spec — the
//! daemon observes sessions, it doesn't own the process that spawns a
//! new terminal window. Consumed only by the request router's
//! `smart_tile_add` and `launch_session` paths.

use async_trait::async_trait;
use corral_core::Rect;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LauncherError {
    #[error("no terminal emulator is registered for this platform")]
    Unsupported,
    #[error("launch failed: {0}")]
    Failed(String),
}

/// Launches a new terminal window running an AI-coding session. Returns
/// the launch method name (e.g. `"iterm"`, `"wezterm"`) on success, which
/// the router echoes back in `smart_tile_add_result.launch_method`.
#[async_trait]
pub trait SessionLauncher: Send + Sync + 'static {
    async fn launch(
        &self,
        cwd: &Path,
        preferred_terminal: Option<&str>,
        target_bounds: Option<Rect>,
        dangerously_skip_permissions: bool,
    ) -> Result<String, LauncherError>;
}

/// No terminal emulator wired up; every launch request fails with
/// `Unsupported`. Used until a platform-specific launcher is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSessionLauncher;

#[async_trait]
impl SessionLauncher for NoopSessionLauncher {
    async fn launch(
        &self,
        _cwd: &Path,
        _preferred_terminal: Option<&str>,
        _target_bounds: Option<Rect>,
        _dangerously_skip_permissions: bool,
    ) -> Result<String, LauncherError> {
        Err(LauncherError::Unsupported)
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{LauncherError, SessionLauncher};
    use async_trait::async_trait;
    use corral_core::Rect;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone)]
    pub struct LaunchCall {
        pub cwd: PathBuf,
        pub target_bounds: Option<Rect>,
        pub dangerously_skip_permissions: bool,
    }

    #[derive(Default)]
    pub struct FakeSessionLauncher {
        calls: Mutex<Vec<LaunchCall>>,
        fail_next: Mutex<bool>,
    }

    impl FakeSessionLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next_launch(&self) {
            *self.fail_next.lock() = true;
        }

        pub fn calls(&self) -> Vec<LaunchCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl SessionLauncher for FakeSessionLauncher {
        async fn launch(
            &self,
            cwd: &Path,
            _preferred_terminal: Option<&str>,
            target_bounds: Option<Rect>,
            dangerously_skip_permissions: bool,
        ) -> Result<String, LauncherError> {
            self.calls.lock().push(LaunchCall {
                cwd: cwd.to_path_buf(),
                target_bounds,
                dangerously_skip_permissions,
            });
            if std::mem::take(&mut *self.fail_next.lock()) {
                return Err(LauncherError::Failed("fake failure".to_string()));
            }
            Ok("fake".to_string())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSessionLauncher, LaunchCall};

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
