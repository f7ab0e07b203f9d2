// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifier and record for tracking one observed AI-coding
//! process.

use crate::terminal_key::TerminalKey;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Server-assigned identifier for one observed session, stable for the
    /// session's lifetime. Distinct from the wire-level `session_id` string
    /// a client process reports; the registry maps the latter onto one of
    /// these on first `session_start`.
    pub struct SessionId("sess-");
}

/// State machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Working,
    Awaiting,
    Idle,
    Ended,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Ended)
    }
}

/// Token accounting echoed by `assistant_response_complete` events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMetrics {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
}

/// One observed AI-coding process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// The externally-reported session id from the wire event, kept so
    /// later events for the same process resolve to this record.
    pub wire_id: String,
    pub title: Option<String>,
    pub transcript_path: Option<String>,
    pub cwd: Option<String>,
    pub project_name: Option<String>,
    pub git_repo_root: Option<String>,
    pub git_branch: Option<String>,
    pub git_worktree: Option<String>,
    pub terminal_key: TerminalKey,
    pub status: SessionStatus,
    pub last_tool_name: Option<String>,
    pub context_metrics: Option<ContextMetrics>,
    pub registered_at_epoch_ms: u64,
    pub last_activity_epoch_ms: u64,
    pub autocompact: bool,
    /// Number of tool calls currently believed to be in flight. Used to
    /// decide whether `tool_use_end` should fall back to `idle` or stay
    /// `working`.
    pub active_tool_calls: u32,
}

impl Session {
    pub fn is_focusable(&self) -> bool {
        !self.status.is_terminal() && !self.terminal_key.is_empty()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
