// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server -> client message shapes for the UI subscription hub: broadcast
//! state changes and the `*_result` replies to client requests.

use corral_core::{NotificationSettings, Session, SessionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One worktree as reported by `list_worktrees` (external collaborator
/// pass-through; shape mirrors what the daemon already knows about a
/// session's `cwd`/`git_worktree`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorktreeEntry {
    pub path: PathBuf,
    pub branch: String,
    #[serde(default)]
    pub base_branch: Option<String>,
}

/// Per-window outcome within a multi-window request (`tile_windows`,
/// `position_browser_layout`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowOpOutcome {
    pub session_id: SessionId,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A structured notification fired by the daemon. Rendering itself is out of scope; this is the
/// payload a UI or OS-level notifier would consume.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    pub category: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

/// One message from the daemon to a connected UI client. Tagged on
/// `type`, distinct from the ingress `Event`'s `event` tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    InitialState {
        sessions: Vec<Session>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        focused_session_id: Option<SessionId>,
    },
    SessionUpdate {
        session: Session,
    },
    SessionRemoved {
        session_id: SessionId,
    },
    FocusChanged {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<SessionId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session: Option<Session>,
    },
    AutocompactToggled {
        enabled: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        warning: Option<String>,
    },
    HandoffReady {
        session_id: SessionId,
        path: PathBuf,
    },
    /// Opaque telemetry passthrough.
    ClaudeOperation {
        session_id: SessionId,
        payload: Value,
    },
    ApiLog {
        payload: Value,
    },
    ServerLog {
        payload: Value,
    },
    NotificationFired {
        notification: NotificationPayload,
    },

    // --- `*_result` replies ---
    FocusTerminalResult {
        session_id: SessionId,
        method: String,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    TileWindowsResult {
        outcomes: Vec<WindowOpOutcome>,
    },
    MaximizeWindowResult {
        session_id: SessionId,
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    PositionBrowserLayoutResult {
        outcomes: Vec<WindowOpOutcome>,
    },
    SmartTileAddResult {
        success: bool,
        repositioned: usize,
        total_tiled: usize,
        used_free_space: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        launch_method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    CreateWorktreeResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        worktree: Option<WorktreeEntry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ListWorktreesResult {
        worktrees: Vec<WorktreeEntry>,
    },
    RemoveWorktreeResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    LaunchSessionResult {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ToggleAutocompactResult {
        enabled: bool,
    },
    UpdateNotificationSettingsResult {
        settings: NotificationSettings,
    },
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
