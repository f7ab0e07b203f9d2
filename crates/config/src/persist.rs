// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic on-disk persistence for the two small settings documents the
//! daemon reads at startup and rewrites on `toggle_autocompact` /
//! `update_notification_settings` requests.
//!
//! Both writers follow the same pattern as the teacher's breadcrumb
//! writer: write to a sibling temp file, then `rename()` into place, so a
//! reader never observes a half-written file. Unlike the breadcrumb
//! writer, a failed settings write is surfaced to the caller — the
//! daemon's `*_result` reply needs to tell the client whether the toggle
//! actually stuck.

use crate::error::ConfigError;
use corral_core::{AutocompactSettings, NotificationSettings};
use std::path::{Path, PathBuf};

fn atomic_write_json(path: &Path, value: &serde_json::Value) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
    }
    let tmp_path = path.with_file_name(format!(
        "{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("settings"),
        nanoid::nanoid!(8)
    ));

    let json = serde_json::to_string_pretty(value)
        .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })?;
    std::fs::write(&tmp_path, json.as_bytes())
        .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })?;
    std::fs::rename(&tmp_path, path).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
}

fn read_json_object(path: &Path) -> Result<serde_json::Value, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(serde_json::Value::Object(Default::default())),
        Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
    }
}

/// Reads and writes the `autoCompact` flag inside a Claude Code-style
/// settings JSON document, preserving every other key untouched.
#[derive(Clone)]
pub struct AutocompactStore {
    path: PathBuf,
}

impl AutocompactStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read(&self) -> Result<AutocompactSettings, ConfigError> {
        let doc = read_json_object(&self.path)?;
        let enabled = doc.get("autoCompact").and_then(|v| v.as_bool()).unwrap_or(true);
        Ok(AutocompactSettings { enabled })
    }

    /// Merges `settings.enabled` into the existing document under
    /// `autoCompact`, leaving every other key as-is, and writes it back
    /// atomically.
    pub fn write(&self, settings: AutocompactSettings) -> Result<(), ConfigError> {
        let mut doc = read_json_object(&self.path)?;
        let object = doc.as_object_mut().ok_or_else(|| ConfigError::Json {
            path: self.path.clone(),
            source: serde::de::Error::custom("settings document is not a JSON object"),
        })?;
        object.insert("autoCompact".to_string(), serde_json::Value::Bool(settings.enabled));
        atomic_write_json(&self.path, &doc)
    }
}

/// Reads and writes the per-category notification toggles. Unlike
/// [`AutocompactStore`], this document is wholly owned by corral, so it's
/// round-tripped through the typed struct rather than merged.
#[derive(Clone)]
pub struct NotificationStore {
    path: PathBuf,
}

impl NotificationStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn read(&self) -> Result<NotificationSettings, ConfigError> {
        let doc = read_json_object(&self.path)?;
        if let serde_json::Value::Object(map) = &doc {
            if map.is_empty() {
                return Ok(NotificationSettings::default());
            }
        }
        serde_json::from_value(doc).map_err(|source| ConfigError::Json { path: self.path.clone(), source })
    }

    pub fn write(&self, settings: NotificationSettings) -> Result<(), ConfigError> {
        let value = serde_json::to_value(settings).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })?;
        atomic_write_json(&self.path, &value)
    }
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
