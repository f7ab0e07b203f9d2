// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-display tile arrangement the daemon believes is on screen.

use crate::geometry::{DisplayId, Rect};
use crate::session::SessionId;
use crate::terminal_key::TerminalKey;
use serde::{Deserialize, Serialize};

/// One tiled window slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledSlot {
    pub terminal_key: TerminalKey,
    pub session_id: SessionId,
    pub rect: Rect,
    pub column: usize,
    pub row: usize,
}

/// The daemon's belief about how windows are arranged on one display
///.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileState {
    pub display_id: DisplayId,
    pub work_area: Rect,
    pub columns_per_row: Vec<usize>,
    pub slots: Vec<TiledSlot>,
    pub tiled_at_epoch_ms: u64,
}

impl TileState {
    /// Invariant check used by tests and by callers that want a sanity
    /// assertion before trusting a freshly built state.
    pub fn is_consistent(&self) -> bool {
        let total: usize = self.columns_per_row.iter().sum();
        if total != self.slots.len() {
            return false;
        }
        match self.columns_per_row.as_slice() {
            [] | [_] => {}
            [first, second] => {
                if first < second {
                    return false;
                }
            }
            _ => return false,
        }
        true
    }

    pub fn slot_for_session(&self, session_id: &SessionId) -> Option<&TiledSlot> {
        self.slots.iter().find(|s| &s.session_id == session_id)
    }

    pub fn contains_session(&self, session_id: &SessionId) -> bool {
        self.slot_for_session(session_id).is_some()
    }
}

#[cfg(test)]
#[path = "tile_tests.rs"]
mod tests;
