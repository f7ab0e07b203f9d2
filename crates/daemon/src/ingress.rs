// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event ingress (C1): a `UnixListener` accepting an unbounded number of
//! concurrent JSONL streams, one spawned task per connection. Socket I/O
//! is kept separate from registry mutation, mirroring the teacher's
//! `oj-daemon::listener` / `oj-engine` split.

use crate::error::DaemonError;
use corral_registry::RegistryHandle;
use corral_wire::decode_line;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

/// Binds the ingress socket at `path`, unlinking a stale socket left
/// behind by a crashed daemon. If a *live* daemon still owns the path
/// (connecting to it succeeds), startup fails rather than stealing the
/// socket out from under it.
pub async fn bind(path: &Path) -> Result<UnixListener, DaemonError> {
    if path.exists() {
        match UnixStream::connect(path).await {
            Ok(_) => return Err(DaemonError::IngressSocketInUse(path.to_path_buf())),
            Err(_) => {
                let _ = std::fs::remove_file(path);
            }
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|source| DaemonError::IngressBind { path: path.to_path_buf(), source })?;
    }

    UnixListener::bind(path).map_err(|source| DaemonError::IngressBind { path: path.to_path_buf(), source })
}

/// Accepts connections on `listener` until the task is aborted, spawning
/// one handler per connection. Never returns on its own.
pub async fn serve(listener: UnixListener, registry: RegistryHandle) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let registry = registry.clone();
                tokio::spawn(async move {
                    handle_connection(stream, registry).await;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "ingress accept failed");
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, registry: RegistryHandle) {
    let mut lines = BufReader::new(stream).lines();
    let mut malformed_logged = false;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break, // peer closed cleanly
            Err(e) => {
                tracing::warn!(error = %e, "ingress connection read error");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match decode_line(&line) {
            Ok(event) => {
                if let Err(e) = registry.ingest(event).await {
                    tracing::warn!(error = %e, "registry unavailable, dropping event");
                    break;
                }
            }
            Err(corral_wire::IngressError::UnknownKind(kind)) => {
                tracing::debug!(kind = %kind, "ingress: unrecognized event kind");
            }
            Err(e) => {
                if malformed_logged {
                    tracing::debug!(error = %e, "ingress: malformed record (suppressed repeat warning)");
                } else {
                    tracing::warn!(error = %e, "ingress: malformed record");
                    malformed_logged = true;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "ingress_tests.rs"]
mod tests;
