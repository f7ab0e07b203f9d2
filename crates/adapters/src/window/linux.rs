// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linux (X11) adapter: drives window placement through `xdotool` and
//! display enumeration through `xrandr`. Wayland compositors generally
//! don't expose this level of external window control; on Wayland this
//! adapter's calls will fail and callers fall back the same way they do
//! for any other `Unsupported`/timeout result.

use super::ancestor::{resolve_ancestor_pid, ProcessInfo, ProcessTable, SystemProcessTable};
use super::cache::DisplayCache;
use super::{WindowAdapter, WindowAdapterError};
use async_trait::async_trait;
use corral_core::{Display, DisplayId, Rect, TerminalKey};
use std::process::Command;
use std::time::Duration;
use tokio::time::timeout;

const ADAPTER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct LinuxWindowAdapter {
    display_cache: DisplayCache,
}

impl Default for LinuxWindowAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxWindowAdapter {
    pub fn new() -> Self {
        Self { display_cache: DisplayCache::new() }
    }

    fn resolve_owner_pid(&self, terminal_key: &TerminalKey) -> Option<u32> {
        let pid = terminal_key.pid()?;
        resolve_ancestor_pid(&SystemProcessTable, pid, owns_x11_window)
    }
}

fn owns_x11_window(info: &ProcessInfo) -> bool {
    const WINDOW_OWNING_PROCS: &[&str] =
        &["gnome-terminal", "konsole", "xterm", "alacritty", "kitty", "wezterm"];
    WINDOW_OWNING_PROCS.iter().any(|name| info.name.contains(name))
}

fn run(cmd: &str, args: &[&str]) -> Result<String, WindowAdapterError> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .map_err(|e| WindowAdapterError::Other(format!("{cmd} spawn failed: {e}")))?;
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
        Ok(Err(_)) => Err(WindowAdapterError::Other("adapter task panicked".into())),
        Err(_) => Err(WindowAdapterError::Timeout),
    }
}

fn window_id_for_pid(pid: u32) -> Result<String, WindowAdapterError> {
    let out = run("xdotool", &["search", "--pid", &pid.to_string()])?;
    out.lines().next().map(str::to_string).ok_or(WindowAdapterError::NoWindow)
}

#[async_trait]
impl WindowAdapter for LinuxWindowAdapter {
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError> {
        self.display_cache
            .get_or_fetch(|| async {
                let raw = run_blocking(|| run("xrandr", &["--query"])).await?;
                Ok(parse_xrandr(&raw))
            })
            .await
    }

    async fn position_window(
        &self,
        terminal_key: &TerminalKey,
        rect: Rect,
    ) -> Result<(), WindowAdapterError> {
        let pid = self.resolve_owner_pid(terminal_key).ok_or(WindowAdapterError::NoWindow)?;
        run_blocking(move || {
            let window_id = window_id_for_pid(pid)?;
            run(
                "xdotool",
                &[
                    "windowmove",
                    &window_id,
                    &rect.x.to_string(),
                    &rect.y.to_string(),
                ],
            )?;
            run(
                "xdotool",
                &[
                    "windowsize",
                    &window_id,
                    &rect.width.to_string(),
                    &rect.height.to_string(),
                ],
            )
        })
        .await
        .map(|_| ())
    }

    async fn get_window_bounds(
        &self,
        terminal_key: &TerminalKey,
    ) -> Result<Option<Rect>, WindowAdapterError> {
        let pid = match self.resolve_owner_pid(terminal_key) {
            Some(pid) => pid,
            None => return Ok(None),
        };
        let raw = run_blocking(move || {
            let window_id = window_id_for_pid(pid)?;
            run("xdotool", &["getwindowgeometry", "--shell", &window_id])
        })
        .await?;
        Ok(parse_getwindowgeometry(&raw))
    }

    async fn position_browser_window(&self, _rect: Rect) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn activate(&self, terminal_key: &TerminalKey) -> Result<(), WindowAdapterError> {
        let pid = self.resolve_owner_pid(terminal_key).ok_or(WindowAdapterError::NoWindow)?;
        run_blocking(move || {
            let window_id = window_id_for_pid(pid)?;
            run("xdotool", &["windowactivate", &window_id])
        })
        .await
        .map(|_| ())
    }

    async fn frontmost_candidates(&self) -> Vec<TerminalKey> {
        let raw = run_blocking(|| run("xdotool", &["getactivewindow", "getwindowpid"])).await;
        match raw {
            Ok(pid_str) => {
                pid_str.trim().parse::<u32>().map(|pid| vec![TerminalKey::new(format!("PID:{pid}"))]).unwrap_or_default()
            }
            Err(_) => Vec::new(),
        }
    }

    fn supports_window_bounds(&self) -> bool {
        true
    }
}

fn parse_xrandr(raw: &str) -> Vec<Display> {
    let mut displays = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let Some(connected_idx) = line.find(" connected") else { continue };
        let rest = &line[connected_idx + " connected".len()..];
        let is_primary = rest.trim_start().starts_with("primary");
        let Some(geom) = rest.split_whitespace().find(|tok| tok.contains('x') && tok.contains('+')) else {
            continue;
        };
        if let Some(rect) = parse_geometry_token(geom) {
            displays.push(Display { id: DisplayId(i as u32), bounds: rect, work_area: rect, is_primary });
        }
    }
    displays
}

fn parse_geometry_token(token: &str) -> Option<Rect> {
    let (size, offset) = token.split_once('+').map(|(s, o)| (s, format!("+{o}")))?;
    let (width, height) = size.split_once('x')?;
    let mut parts = offset.trim_start_matches('+').splitn(2, '+');
    let x = parts.next()?;
    let y = parts.next()?;
    Some(Rect::new(x.parse().ok()?, y.parse().ok()?, width.parse().ok()?, height.parse().ok()?))
}

fn parse_getwindowgeometry(raw: &str) -> Option<Rect> {
    let mut x = None;
    let mut y = None;
    let mut width = None;
    let mut height = None;
    for line in raw.lines() {
        let (key, value) = line.split_once('=')?;
        match key {
            "X" => x = value.parse().ok(),
            "Y" => y = value.parse().ok(),
            "WIDTH" => width = value.parse().ok(),
            "HEIGHT" => height = value.parse().ok(),
            _ => {}
        }
    }
    Some(Rect::new(x?, y?, width?, height?))
}

#[cfg(test)]
#[path = "linux_tests.rs"]
mod tests;
