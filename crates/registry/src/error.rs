// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the registry and tile-state actors.

use thiserror::Error;

/// Errors surfaced by [`crate::registry::RegistryHandle`] and
/// [`crate::tiles::TileStateHandle`]. Both actors are mpsc mailboxes; the
/// only way a call can fail is the mailbox having been dropped (the
/// daemon is shutting down) or the actor task having panicked.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("registry actor is no longer running")]
    Closed,
}
