// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration, loaded from a single TOML file and layered under
//! CLI flags (the CLI always wins; see `corral-daemon`'s arg parsing).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn runtime_dir_fallback() -> PathBuf {
    dirs::runtime_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".corral")))
        .unwrap_or_else(|| PathBuf::from("/tmp"))
}

fn config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("corral")
}

fn home_claude_settings() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".claude").join("settings.json")
}

/// Fully-resolved daemon configuration. Every field has a usable default;
/// `DaemonConfig::load` layers a TOML file's values on top of
/// `DaemonConfig::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    /// Unix socket the event ingress (C1) listens on.
    pub ingress_socket_path: PathBuf,
    /// Loopback address the subscription hub's WebSocket server binds.
    pub ws_bind_addr: String,
    pub ws_port: u16,
    /// How long a session may sit with no activity before it's eligible
    /// for stale reaping.
    pub stale_reap_threshold: Duration,
    /// How often the registry sweeps for stale sessions.
    pub stale_reap_interval: Duration,
    /// How often the registry verifies hosting processes are still alive.
    pub process_verify_interval: Duration,
    /// How often the focus watcher polls `frontmost_candidates`.
    pub focus_poll_interval: Duration,
    /// Upper bound on a single window-adapter call before it's timed out.
    pub window_adapter_timeout: Duration,
    /// Path (relative to a session's project root) where handoff artifacts
    /// are written, watched by C8.
    pub handoff_relative_path: PathBuf,
    /// Where the autocompact toggle is persisted (default mirrors Claude
    /// Code's own settings file so the two features share one flag).
    pub autocompact_settings_path: PathBuf,
    /// Where per-category notification toggles are persisted.
    pub notification_settings_path: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            ingress_socket_path: runtime_dir_fallback().join("corral").join("ingress.sock"),
            ws_bind_addr: "127.0.0.1".to_string(),
            ws_port: 4242,
            stale_reap_threshold: Duration::from_secs(5 * 60),
            stale_reap_interval: Duration::from_secs(5 * 60),
            process_verify_interval: Duration::from_secs(30),
            focus_poll_interval: Duration::from_millis(250),
            window_adapter_timeout: Duration::from_secs(10),
            handoff_relative_path: PathBuf::from(".jacques/handoffs"),
            autocompact_settings_path: home_claude_settings(),
            notification_settings_path: config_dir().join("notifications.json"),
        }
    }
}

/// Mirrors [`DaemonConfig`] but every field is optional, for deserializing
/// a TOML file that only overrides a subset of settings.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    ingress_socket_path: Option<PathBuf>,
    ws_bind_addr: Option<String>,
    ws_port: Option<u16>,
    stale_reap_threshold_secs: Option<u64>,
    stale_reap_interval_secs: Option<u64>,
    process_verify_interval_secs: Option<u64>,
    focus_poll_interval_ms: Option<u64>,
    window_adapter_timeout_secs: Option<u64>,
    handoff_relative_path: Option<PathBuf>,
    autocompact_settings_path: Option<PathBuf>,
    notification_settings_path: Option<PathBuf>,
}

impl RawConfig {
    fn apply(self, mut base: DaemonConfig) -> DaemonConfig {
        if let Some(v) = self.ingress_socket_path {
            base.ingress_socket_path = v;
        }
        if let Some(v) = self.ws_bind_addr {
            base.ws_bind_addr = v;
        }
        if let Some(v) = self.ws_port {
            base.ws_port = v;
        }
        if let Some(v) = self.stale_reap_threshold_secs {
            base.stale_reap_threshold = Duration::from_secs(v);
        }
        if let Some(v) = self.stale_reap_interval_secs {
            base.stale_reap_interval = Duration::from_secs(v);
        }
        if let Some(v) = self.process_verify_interval_secs {
            base.process_verify_interval = Duration::from_secs(v);
        }
        if let Some(v) = self.focus_poll_interval_ms {
            base.focus_poll_interval = Duration::from_millis(v);
        }
        if let Some(v) = self.window_adapter_timeout_secs {
            base.window_adapter_timeout = Duration::from_secs(v);
        }
        if let Some(v) = self.handoff_relative_path {
            base.handoff_relative_path = v;
        }
        if let Some(v) = self.autocompact_settings_path {
            base.autocompact_settings_path = v;
        }
        if let Some(v) = self.notification_settings_path {
            base.notification_settings_path = v;
        }
        base
    }
}

impl DaemonConfig {
    /// Default config file location: `$XDG_CONFIG_HOME/corral/config.toml`,
    /// falling back to `~/.config/corral/config.toml`.
    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Loads config from `path` (or [`DaemonConfig::default_path`] if
    /// `None`), layering it over [`DaemonConfig::default`]. A missing file
    /// at the default path is not an error — it just means "use defaults".
    /// A missing file at an explicitly requested `path` is an error.
    pub fn load(path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = match path {
            Some(p) => (p.clone(), true),
            None => (Self::default_path(), false),
        };

        let contents = match std::fs::read_to_string(&resolved) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %resolved.display(), "no config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Read { path: resolved, source: e }),
        };

        let raw: RawConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::Toml { path: resolved.clone(), source })?;
        Ok(raw.apply(Self::default()))
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
