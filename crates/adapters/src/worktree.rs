// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git worktree management, an external collaborator per spec — corral
//! observes and orchestrates, it doesn't reimplement git. Kept as a thin
//! adapter trait for the same reason as [`crate::window::WindowAdapter`]:
//! the request router needs one capability set it can fake in tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub branch: String,
    pub base_branch: Option<String>,
}

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("git exited with a non-zero status: {0}")]
    CommandFailed(String),
    #[error("git worktree command could not be spawned: {0}")]
    SpawnFailed(String),
}

#[async_trait]
pub trait WorktreeAdapter: Send + Sync + 'static {
    async fn create(
        &self,
        repo_root: &Path,
        name: &str,
        base_branch: Option<&str>,
    ) -> Result<WorktreeInfo, WorktreeError>;

    async fn list(&self, repo_root: &Path) -> Result<Vec<WorktreeInfo>, WorktreeError>;

    async fn remove(&self, repo_root: &Path, name: &str) -> Result<(), WorktreeError>;
}

/// Shells out to `git worktree` directly. Output parsing is deliberately
/// minimal — this is a thin pass-through, not a git porcelain library.
#[derive(Clone, Copy, Debug, Default)]
pub struct GitWorktreeAdapter;

impl GitWorktreeAdapter {
    pub fn new() -> Self {
        Self
    }

    fn run(repo_root: &Path, args: &[&str]) -> Result<String, WorktreeError> {
        let output = std::process::Command::new("git")
            .arg("-C")
            .arg(repo_root)
            .args(args)
            .output()
            .map_err(|e| WorktreeError::SpawnFailed(e.to_string()))?;
        if !output.status.success() {
            return Err(WorktreeError::CommandFailed(String::from_utf8_lossy(&output.stderr).trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl WorktreeAdapter for GitWorktreeAdapter {
    async fn create(
        &self,
        repo_root: &Path,
        name: &str,
        base_branch: Option<&str>,
    ) -> Result<WorktreeInfo, WorktreeError> {
        let repo_root = repo_root.to_path_buf();
        let name = name.to_string();
        let base_branch = base_branch.map(str::to_string);
        tokio::task::spawn_blocking(move || {
            let worktree_path = repo_root.join(".worktrees").join(&name);
            let path_str = worktree_path.to_string_lossy().to_string();
            let mut args = vec!["worktree", "add", "-b", name.as_str(), path_str.as_str()];
            if let Some(base) = &base_branch {
                args.push(base);
            }
            Self::run(&repo_root, &args)?;
            Ok(WorktreeInfo { path: worktree_path, branch: name, base_branch })
        })
        .await
        .map_err(|e| WorktreeError::SpawnFailed(e.to_string()))?
    }

    async fn list(&self, repo_root: &Path) -> Result<Vec<WorktreeInfo>, WorktreeError> {
        let repo_root = repo_root.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let raw = Self::run(&repo_root, &["worktree", "list", "--porcelain"])?;
            Ok(parse_porcelain(&raw))
        })
        .await
        .map_err(|e| WorktreeError::SpawnFailed(e.to_string()))?
    }

    async fn remove(&self, repo_root: &Path, name: &str) -> Result<(), WorktreeError> {
        let repo_root = repo_root.to_path_buf();
        let worktree_path = repo_root.join(".worktrees").join(name);
        tokio::task::spawn_blocking(move || {
            Self::run(&repo_root, &["worktree", "remove", "--force", &worktree_path.to_string_lossy()])?;
            Ok(())
        })
        .await
        .map_err(|e| WorktreeError::SpawnFailed(e.to_string()))?
    }
}

fn parse_porcelain(raw: &str) -> Vec<WorktreeInfo> {
    let mut entries = Vec::new();
    let mut path: Option<PathBuf> = None;
    let mut branch: Option<String> = None;

    for line in raw.lines() {
        if let Some(p) = line.strip_prefix("worktree ") {
            if let Some(path) = path.take() {
                entries.push(WorktreeInfo { path, branch: branch.take().unwrap_or_default(), base_branch: None });
            }
            path = Some(PathBuf::from(p));
        } else if let Some(b) = line.strip_prefix("branch refs/heads/") {
            branch = Some(b.to_string());
        } else if line.is_empty() {
            if let Some(path) = path.take() {
                entries.push(WorktreeInfo { path, branch: branch.take().unwrap_or_default(), base_branch: None });
            }
        }
    }
    if let Some(path) = path {
        entries.push(WorktreeInfo { path, branch: branch.unwrap_or_default(), base_branch: None });
    }
    entries
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{WorktreeAdapter, WorktreeError, WorktreeInfo};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};

    #[derive(Default)]
    pub struct FakeWorktreeAdapter {
        worktrees: Mutex<Vec<WorktreeInfo>>,
        fail_next_create: Mutex<bool>,
    }

    impl FakeWorktreeAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next_create(&self) {
            *self.fail_next_create.lock() = true;
        }
    }

    #[async_trait]
    impl WorktreeAdapter for FakeWorktreeAdapter {
        async fn create(
            &self,
            repo_root: &Path,
            name: &str,
            base_branch: Option<&str>,
        ) -> Result<WorktreeInfo, WorktreeError> {
            if std::mem::take(&mut *self.fail_next_create.lock()) {
                return Err(WorktreeError::CommandFailed("fake failure".to_string()));
            }
            let info = WorktreeInfo {
                path: repo_root.join(".worktrees").join(name),
                branch: name.to_string(),
                base_branch: base_branch.map(str::to_string),
            };
            self.worktrees.lock().push(info.clone());
            Ok(info)
        }

        async fn list(&self, _repo_root: &Path) -> Result<Vec<WorktreeInfo>, WorktreeError> {
            Ok(self.worktrees.lock().clone())
        }

        async fn remove(&self, _repo_root: &Path, name: &str) -> Result<(), WorktreeError> {
            self.worktrees.lock().retain(|w| w.branch != name);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWorktreeAdapter;

#[cfg(test)]
#[path = "worktree_tests.rs"]
mod tests;
