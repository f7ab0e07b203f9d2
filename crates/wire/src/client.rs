// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client -> server request shapes for the UI subscription hub.

use corral_core::{DisplayId, SessionId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layout hint for [`ClientMessage::TileWindows`]; when absent the
/// request router picks the default grid for the session count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileLayout {
    Grid,
}

/// Fixed asymmetric split requested by `position_browser_layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserLayout {
    BrowserTerminal,
    BrowserTwoTerminals,
}

/// One request from a connected UI client. Tagged
/// on `type`, distinct from the ingress `Event`'s `event` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Triggers a `focus_changed` broadcast only; no per-client result.
    SelectSession { session_id: SessionId },
    FocusTerminal { session_id: SessionId },
    TileWindows {
        session_ids: Vec<SessionId>,
        #[serde(default)]
        layout: Option<TileLayout>,
        #[serde(default)]
        display_id: Option<DisplayId>,
    },
    MaximizeWindow {
        session_id: SessionId,
        #[serde(default)]
        display_id: Option<DisplayId>,
    },
    PositionBrowserLayout {
        session_ids: Vec<SessionId>,
        layout: BrowserLayout,
    },
    SmartTileAdd {
        #[serde(default)]
        launch_cwd: Option<PathBuf>,
        #[serde(default)]
        new_session_id: Option<SessionId>,
        #[serde(default)]
        display_id: Option<DisplayId>,
        #[serde(default)]
        dangerously_skip_permissions: Option<bool>,
    },
    CreateWorktree {
        repo_root: PathBuf,
        name: String,
        #[serde(default)]
        base_branch: Option<String>,
        #[serde(default)]
        launch_session: Option<bool>,
        #[serde(default)]
        dangerously_skip_permissions: Option<bool>,
    },
    ListWorktrees { repo_root: PathBuf },
    RemoveWorktree { repo_root: PathBuf, name: String },
    LaunchSession {
        cwd: PathBuf,
        #[serde(default)]
        preferred_terminal: Option<String>,
        #[serde(default)]
        dangerously_skip_permissions: Option<bool>,
    },
    ToggleAutocompact { enabled: bool },
    UpdateNotificationSettings { settings: corral_core::NotificationSettings },
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
