// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

/// Top-level daemon errors. Per spec.md §7, the only fatal surface is a
/// listener failing to bind at startup; everything else is handled
/// in-place (logged, or returned as a `*_result.error` string) and never
/// reaches this type.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("another corral daemon already owns the ingress socket at {0}")]
    IngressSocketInUse(PathBuf),

    #[error("failed to bind ingress socket at {path}: {source}")]
    IngressBind { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to bind subscription hub on {addr}: {source}")]
    HubBind { addr: String, #[source] source: std::io::Error },

    #[error("registry actor is no longer running")]
    Registry(#[from] corral_registry::RegistryError),
}
