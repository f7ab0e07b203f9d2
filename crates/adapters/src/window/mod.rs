// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Window adapter interface. The layout engine and
//! request router consume this trait; they never know whether they're
//! talking to AppleScript, PowerShell, xdotool, or a test fake.

mod ancestor;
mod cache;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
mod noop;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use ancestor::{resolve_ancestor_pid, ANCESTOR_WALK_DEPTH};
pub use cache::DisplayCache;
#[cfg(target_os = "linux")]
pub use linux::LinuxWindowAdapter;
#[cfg(target_os = "macos")]
pub use macos::MacosWindowAdapter;
pub use noop::NoopWindowAdapter;
#[cfg(target_os = "windows")]
pub use windows::WindowsWindowAdapter;

use async_trait::async_trait;
use corral_core::{Display, Rect, TerminalKey};
use thiserror::Error;

/// Errors a window adapter invocation can surface. These are returned
/// to the requesting client verbatim via `*_result.error`, never wrapped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowAdapterError {
    /// The terminal key could not be resolved to a live, titled window.
    #[error("no_window")]
    NoWindow,
    /// The underlying OS call did not complete within the adapter's bound.
    #[error("timeout")]
    Timeout,
    /// This platform's adapter doesn't implement the requested capability.
    #[error("unsupported")]
    Unsupported,
    #[error("{0}")]
    Other(String),
}

/// Capability set consumed by the layout engine and request router
///. Implementations that lack an optional
/// capability return `Unsupported` or `Ok(None)` rather than panicking;
/// callers degrade gracefully (section 4.5, 4.6 step 5).
#[async_trait]
pub trait WindowAdapter: Send + Sync {
    /// Enumerates physical displays. Implementations SHOULD cache this for
    /// about 30s on platforms where enumeration is costly (see
    /// [`DisplayCache`]).
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError>;

    /// Positions the window identified by `terminal_key` to `rect`. Success
    /// requires both that the window was found AND that the geometry call
    /// itself succeeded.
    async fn position_window(
        &self,
        terminal_key: &TerminalKey,
        rect: Rect,
    ) -> Result<(), WindowAdapterError>;

    /// Reads a window's current bounds, when this platform supports it.
    /// `Ok(None)` means the platform/adapter cannot supply this (not that
    /// the window doesn't exist) — callers must treat that as a capability
    /// gap, not an error.
    async fn get_window_bounds(
        &self,
        terminal_key: &TerminalKey,
    ) -> Result<Option<Rect>, WindowAdapterError>;

    /// Positions the (out-of-scope-here) browser window for
    /// `position_browser_layout` requests. Adapters without this
    /// capability return `Err(WindowAdapterError::Unsupported)`.
    async fn position_browser_window(&self, rect: Rect) -> Result<(), WindowAdapterError>;

    /// Brings a terminal's window to the front.
    async fn activate(&self, terminal_key: &TerminalKey) -> Result<(), WindowAdapterError>;

    /// Candidate terminal keys for whichever window is currently
    /// frontmost, most-likely match first. Used by
    /// the focus watcher; returns an empty vec rather than erroring when
    /// the platform can't determine this.
    async fn frontmost_candidates(&self) -> Vec<TerminalKey>;

    /// True when [`WindowAdapter::get_window_bounds`] returns real data on
    /// this platform, used to pick the bounds-based vs. session-existence-
    /// based tile validation variant.
    fn supports_window_bounds(&self) -> bool {
        false
    }
}
