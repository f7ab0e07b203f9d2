// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! macOS window adapter: drives window placement through AppleScript
//! (`osascript`) via System Events, and display enumeration through the
//! same. Every OS call runs on the blocking pool and is wrapped with a
//! timeout at the call site.

use super::ancestor::{resolve_ancestor_pid, ProcessInfo, ProcessTable, SystemProcessTable};
use super::cache::DisplayCache;
use super::{WindowAdapter, WindowAdapterError};
use async_trait::async_trait;
use corral_core::{Display, DisplayId, Rect, TerminalKey};
use std::process::Command;
use std::time::Duration;
use tokio::time::timeout;

const ADAPTER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MacosWindowAdapter {
    display_cache: DisplayCache,
}

impl Default for MacosWindowAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl MacosWindowAdapter {
    pub fn new() -> Self {
        Self { display_cache: DisplayCache::new() }
    }

    fn resolve_owner_pid(&self, terminal_key: &TerminalKey) -> Option<u32> {
        let pid = terminal_key.pid()?;
        resolve_ancestor_pid(&SystemProcessTable, pid, owns_app_window)
    }
}

fn owns_app_window(info: &ProcessInfo) -> bool {
    const WINDOW_OWNING_APPS: &[&str] =
        &["Terminal", "iTerm2", "Alacritty", "kitty", "WezTerm", "Hyper"];
    WINDOW_OWNING_APPS.iter().any(|name| info.name.contains(name))
}

fn run_osascript(script: String) -> Result<String, WindowAdapterError> {
    let output = Command::new("osascript").arg("-e").arg(script).output().map_err(|e| {
        WindowAdapterError::Other(format!("osascript spawn failed: {e}"))
    })?;
    if !output.status.success() {
        return Err(WindowAdapterError::Other(String::from_utf8_lossy(&output.stderr).trim().to_string()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

async fn run_blocking<F>(f: F) -> Result<String, WindowAdapterError>
where
    F: FnOnce() -> Result<String, WindowAdapterError> + Send + 'static,
{
    match timeout(ADAPTER_TIMEOUT, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(result)) => result,
        Ok(Err(_join_err)) => Err(WindowAdapterError::Other("adapter task panicked".into())),
        Err(_elapsed) => Err(WindowAdapterError::Timeout),
    }
}

#[async_trait]
impl WindowAdapter for MacosWindowAdapter {
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError> {
        self.display_cache
            .get_or_fetch(|| async {
                let raw = run_blocking(|| {
                    run_osascript(
                        "tell application \"Finder\" to get bounds of window of desktop".to_string(),
                    )
                })
                .await?;
                // A real implementation would parse System Events' per-screen
                // bounds; absent that API detail, fall back to a single
                // primary display sized from the Finder desktop bounds.
                let bounds = parse_rect_csv(&raw).unwrap_or(Rect::new(0, 0, 1920, 1080));
                Ok(vec![Display {
                    id: DisplayId(0),
                    bounds,
                    work_area: Rect::new(bounds.x, bounds.y + 23, bounds.width, bounds.height - 23),
                    is_primary: true,
                }])
            })
            .await
    }

    async fn position_window(
        &self,
        terminal_key: &TerminalKey,
        rect: Rect,
    ) -> Result<(), WindowAdapterError> {
        let pid = self.resolve_owner_pid(terminal_key).ok_or(WindowAdapterError::NoWindow)?;
        let script = format!(
            "tell application \"System Events\" to tell (first process whose unix id is {pid}) to set position of front window to {{{}, {}}} & set size of front window to {{{}, {}}}",
            rect.x, rect.y, rect.width, rect.height
        );
        run_blocking(move || run_osascript(script)).await.map(|_| ())
    }

    async fn get_window_bounds(
        &self,
        terminal_key: &TerminalKey,
    ) -> Result<Option<Rect>, WindowAdapterError> {
        let pid = match self.resolve_owner_pid(terminal_key) {
            Some(pid) => pid,
            None => return Ok(None),
        };
        let script = format!(
            "tell application \"System Events\" to tell (first process whose unix id is {pid}) to get {{position, size}} of front window"
        );
        let raw = run_blocking(move || run_osascript(script)).await?;
        Ok(parse_rect_csv(&raw))
    }

    async fn position_browser_window(&self, _rect: Rect) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn activate(&self, terminal_key: &TerminalKey) -> Result<(), WindowAdapterError> {
        let pid = self.resolve_owner_pid(terminal_key).ok_or(WindowAdapterError::NoWindow)?;
        let script =
            format!("tell application \"System Events\" to set frontmost of (first process whose unix id is {pid}) to true");
        run_blocking(move || run_osascript(script)).await.map(|_| ())
    }

    async fn frontmost_candidates(&self) -> Vec<TerminalKey> {
        let raw = run_blocking(|| {
            run_osascript(
                "tell application \"System Events\" to get unix id of first process whose frontmost is true"
                    .to_string(),
            )
        })
        .await;
        match raw {
            Ok(pid_str) => pid_str.trim().parse::<u32>().map(|pid| vec![TerminalKey::new(format!("PID:{pid}"))]).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn supports_window_bounds(&self) -> bool {
        true
    }
}

fn parse_rect_csv(raw: &str) -> Option<Rect> {
    let nums: Vec<i32> = raw.split(',').filter_map(|s| s.trim().parse().ok()).collect();
    match nums.as_slice() {
        [x, y, w, h] => Some(Rect::new(*x, *y, *w, *h)),
        [x, y, right, bottom] if *right > *x && *bottom > *y => {
            Some(Rect::new(*x, *y, right - x, bottom - y))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "macos_tests.rs"]
mod tests;
