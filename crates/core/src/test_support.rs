// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared by other crates' test suites. Enabled via the
//! `test-support` feature.

use crate::clock::Clock;
use crate::session::{Session, SessionId, SessionStatus};
use crate::terminal_key::TerminalKey;

/// Builder for a [`Session`] with sane test defaults.
pub struct SessionBuilder {
    session: Session,
}

impl SessionBuilder {
    pub fn new(clock: &impl Clock, wire_id: impl Into<String>) -> Self {
        let now = clock.epoch_ms();
        Self {
            session: Session {
                id: SessionId::new(),
                wire_id: wire_id.into(),
                title: None,
                transcript_path: None,
                cwd: None,
                project_name: None,
                git_repo_root: None,
                git_branch: None,
                git_worktree: None,
                terminal_key: TerminalKey::new(""),
                status: SessionStatus::Active,
                last_tool_name: None,
                context_metrics: None,
                registered_at_epoch_ms: now,
                last_activity_epoch_ms: now,
                autocompact: false,
                active_tool_calls: 0,
            },
        }
    }

    pub fn terminal_key(mut self, key: impl Into<String>) -> Self {
        self.session.terminal_key = TerminalKey::new(key.into());
        self
    }

    pub fn status(mut self, status: SessionStatus) -> Self {
        self.session.status = status;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<String>) -> Self {
        self.session.cwd = Some(cwd.into());
        self
    }

    pub fn build(self) -> Session {
        self.session
    }
}
