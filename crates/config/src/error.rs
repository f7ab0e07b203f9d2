// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to parse {path} as TOML: {source}")]
    Toml { path: PathBuf, #[source] source: toml::de::Error },

    #[error("failed to parse {path} as JSON: {source}")]
    Json { path: PathBuf, #[source] source: serde_json::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, #[source] source: std::io::Error },

    #[error("no home directory could be determined for the default config path")]
    NoHomeDir,
}
