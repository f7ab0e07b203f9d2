// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal key identifying the OS-level window hosting a session.
//!
//! Format depends on platform: `ITERM:<id>`, `TTY:<dev>`, `PID:<pid>`,
//! `CONPTY:<pid>`, `WINTERM:<pid>`, optionally prefixed `DISCOVERED:` when
//! the session was found by a startup scan rather than reported directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The recognized terminal-key families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKeyKind {
    Iterm,
    Tty,
    Pid,
    Conpty,
    Winterm,
    /// A variant this build doesn't recognize; still a valid opaque key.
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalKey(pub String);

impl TerminalKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when this key carries the `DISCOVERED:` startup-scan prefix.
    pub fn is_discovered(&self) -> bool {
        self.0.starts_with("DISCOVERED:")
    }

    /// The key with any `DISCOVERED:` prefix stripped, as the window
    /// adapter must do before resolution.
    pub fn stripped(&self) -> &str {
        self.0.strip_prefix("DISCOVERED:").unwrap_or(&self.0)
    }

    pub fn kind(&self) -> TerminalKeyKind {
        let body = self.stripped();
        if body.starts_with("ITERM:") {
            TerminalKeyKind::Iterm
        } else if body.starts_with("TTY:") {
            TerminalKeyKind::Tty
        } else if body.starts_with("PID:") {
            TerminalKeyKind::Pid
        } else if body.starts_with("CONPTY:") {
            TerminalKeyKind::Conpty
        } else if body.starts_with("WINTERM:") {
            TerminalKeyKind::Winterm
        } else {
            TerminalKeyKind::Unknown
        }
    }

    /// Extracts the PID when the key encodes one: `PID:<n>`, `CONPTY:<n>`,
    /// `WINTERM:<n>`, or a trailing `:<n>` on any other variant.
    pub fn pid(&self) -> Option<u32> {
        let body = self.stripped();
        let (_, tail) = body.rsplit_once(':')?;
        tail.parse().ok()
    }
}

impl fmt::Display for TerminalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TerminalKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TerminalKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for TerminalKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
#[path = "terminal_key_tests.rs"]
mod tests;
