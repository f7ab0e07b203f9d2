// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted user preferences. These are small, serde-transparent
//! shapes shared between the on-disk settings files (`corral-config`) and
//! the wire protocol (`corral-wire`) that echoes them back to clients —
//! kept here, alongside `Session`, as the one shared domain vocabulary.

use serde::{Deserialize, Serialize};

/// Autocompact toggle and its optional accompanying warning, as echoed by
/// the `autocompact_toggled { enabled, warning? }` broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutocompactSettings {
    pub enabled: bool,
}

impl Default for AutocompactSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Per-category desktop notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub handoff_ready: bool,
    #[serde(default = "default_true")]
    pub awaiting_approval: bool,
    #[serde(default)]
    pub session_ended: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { handoff_ready: true, awaiting_approval: true, session_ended: false }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
