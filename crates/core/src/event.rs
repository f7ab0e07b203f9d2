// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events emitted by observed session processes over the ingress socket
//!. One JSON object per newline-delimited record.

use crate::session::ContextMetrics;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event record read from the ingress socket.
///
/// Tagged on the `event` field to match the ingress wire shape verbatim
/// (`{"event": "session_start", ...}`), not the more common `"type"` tag
/// used by the daemon's own client protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SessionStart {
        session_id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        transcript_path: Option<String>,
        #[serde(default)]
        cwd: Option<String>,
        #[serde(default)]
        project: Option<String>,
        #[serde(default)]
        git_repo_root: Option<String>,
        #[serde(default)]
        git_branch: Option<String>,
        #[serde(default)]
        git_worktree: Option<String>,
        #[serde(default)]
        terminal: Option<String>,
        #[serde(default)]
        terminal_key: Option<String>,
    },
    SessionUpdate {
        session_id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        transcript_path: Option<String>,
        #[serde(default)]
        cwd: Option<String>,
        #[serde(default)]
        project: Option<String>,
        #[serde(default)]
        git_repo_root: Option<String>,
        #[serde(default)]
        git_branch: Option<String>,
        #[serde(default)]
        git_worktree: Option<String>,
        #[serde(default)]
        terminal_key: Option<String>,
    },
    ToolUseStart {
        session_id: String,
        tool_name: String,
    },
    ToolUseAwaitingApproval {
        session_id: String,
        tool_name: String,
    },
    ToolUseEnd {
        session_id: String,
        #[serde(default)]
        tool_name: Option<String>,
    },
    AssistantResponseComplete {
        session_id: String,
        #[serde(default)]
        context_metrics: Option<ContextMetrics>,
    },
    SessionEnd {
        session_id: String,
    },
    /// Opaque telemetry forwarded to subscribers as-is.
    ClaudeOperation {
        session_id: String,
        #[serde(default)]
        payload: Value,
    },
}

impl Event {
    /// The wire-level session id every event variant carries.
    pub fn session_id(&self) -> &str {
        match self {
            Event::SessionStart { session_id, .. }
            | Event::SessionUpdate { session_id, .. }
            | Event::ToolUseStart { session_id, .. }
            | Event::ToolUseAwaitingApproval { session_id, .. }
            | Event::ToolUseEnd { session_id, .. }
            | Event::AssistantResponseComplete { session_id, .. }
            | Event::SessionEnd { session_id, .. }
            | Event::ClaudeOperation { session_id, .. } => session_id,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
