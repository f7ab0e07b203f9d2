// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows adapter: drives window placement through PowerShell calling
//! into user32 (`MoveWindow`, `SetForegroundWindow`) via inline C# (Add-Type),
//! the same shell-out-to-a-platform-CLI approach the macOS and Linux
//! adapters use rather than linking platform bindings directly.

use super::ancestor::{resolve_ancestor_pid, ProcessInfo, ProcessTable, SystemProcessTable};
use super::cache::DisplayCache;
use super::{WindowAdapter, WindowAdapterError};
use async_trait::async_trait;
use corral_core::{Display, DisplayId, Rect, TerminalKey};
use std::process::Command;
use std::time::Duration;
use tokio::time::timeout;

const ADAPTER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WindowsWindowAdapter {
    display_cache: DisplayCache,
}

impl Default for WindowsWindowAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowsWindowAdapter {
    pub fn new() -> Self {
        Self { display_cache: DisplayCache::new() }
    }

    fn resolve_owner_pid(&self, terminal_key: &TerminalKey) -> Option<u32> {
        let pid = terminal_key.pid()?;
        resolve_ancestor_pid(&SystemProcessTable, pid, owns_console_window)
    }
}

fn owns_console_window(info: &ProcessInfo) -> bool {
    const WINDOW_OWNING_PROCS: &[&str] = &["WindowsTerminal", "conhost", "OpenConsole"];
    WINDOW_OWNING_PROCS.iter().any(|name| info.name.eq_ignore_ascii_case(name))
}

fn run_powershell(script: &str) -> Result<String, WindowAdapterError> {
    let output = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", script])
        .output()
        .map_err(|e| WindowAdapterError::Other(format!("powershell spawn failed: {e}")))?;
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

#[async_trait]
impl WindowAdapter for WindowsWindowAdapter {
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError> {
        self.display_cache
            .get_or_fetch(|| async {
                let raw = run_blocking(|| {
                    run_powershell(
                        "Add-Type -AssemblyName System.Windows.Forms; \
                         [System.Windows.Forms.Screen]::AllScreens | ForEach-Object { \
                         \"$($_.Bounds.X),$($_.Bounds.Y),$($_.Bounds.Width),$($_.Bounds.Height),$($_.WorkingArea.X),$($_.WorkingArea.Y),$($_.WorkingArea.Width),$($_.WorkingArea.Height),$($_.Primary)\" }",
                    )
                })
                .await?;
                Ok(raw.lines().enumerate().filter_map(|(i, line)| parse_display_line(i as u32, line)).collect())
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
            "$p = Get-Process -Id {pid}; $h = $p.MainWindowHandle; \
             Add-Type -TypeDefinition 'using System.Runtime.InteropServices; public class Win32 {{ [DllImport(\"user32.dll\")] public static extern bool MoveWindow(System.IntPtr hWnd, int X, int Y, int nWidth, int nHeight, bool bRepaint); }}'; \
             [Win32]::MoveWindow($h, {}, {}, {}, {}, $true)",
            rect.x, rect.y, rect.width, rect.height
        );
        run_blocking(move || run_powershell(&script)).await.map(|_| ())
    }

    async fn get_window_bounds(
        &self,
        _terminal_key: &TerminalKey,
    ) -> Result<Option<Rect>, WindowAdapterError> {
        Ok(None)
    }

    async fn position_browser_window(&self, _rect: Rect) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn activate(&self, terminal_key: &TerminalKey) -> Result<(), WindowAdapterError> {
        let pid = self.resolve_owner_pid(terminal_key).ok_or(WindowAdapterError::NoWindow)?;
        let script = format!(
            "$p = Get-Process -Id {pid}; \
             Add-Type -TypeDefinition 'using System.Runtime.InteropServices; public class Win32b {{ [DllImport(\"user32.dll\")] public static extern bool SetForegroundWindow(System.IntPtr hWnd); }}'; \
             [Win32b]::SetForegroundWindow($p.MainWindowHandle)"
        );
        run_blocking(move || run_powershell(&script)).await.map(|_| ())
    }

    async fn frontmost_candidates(&self) -> Vec<TerminalKey> {
        Vec::new()
    }

    fn supports_window_bounds(&self) -> bool {
        false
    }
}

fn parse_display_line(id: u32, line: &str) -> Option<Display> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 9 {
        return None;
    }
    let parse = |i: usize| fields[i].trim().parse::<i32>().ok();
    let bounds = Rect::new(parse(0)?, parse(1)?, parse(2)?, parse(3)?);
    let work_area = Rect::new(parse(4)?, parse(5)?, parse(6)?, parse(7)?);
    let is_primary = fields[8].trim().eq_ignore_ascii_case("true");
    Some(Display { id: DisplayId(id), bounds, work_area, is_primary })
}

#[cfg(test)]
#[path = "windows_tests.rs"]
mod tests;
