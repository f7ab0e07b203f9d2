// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::geometry::Rect;

fn slot(id: &str, x: i32) -> TiledSlot {
    TiledSlot {
        terminal_key: TerminalKey::new(format!("PID:{id}")),
        session_id: SessionId::from_string(format!("sess-{id}")),
        rect: Rect::new(x, 0, 10, 10),
        column: 0,
        row: 0,
    }
}

#[test]
fn consistent_when_columns_sum_matches_slot_count() {
    let state = TileState {
        display_id: DisplayId(1),
        work_area: Rect::new(0, 0, 20, 10),
        columns_per_row: vec![2],
        slots: vec![slot("a", 0), slot("b", 10)],
        tiled_at_epoch_ms: 0,
    };
    assert!(state.is_consistent());
}

#[test]
fn inconsistent_when_second_row_wider_than_first() {
    let state = TileState {
        display_id: DisplayId(1),
        work_area: Rect::new(0, 0, 20, 10),
        columns_per_row: vec![2, 3],
        slots: vec![slot("a", 0), slot("b", 10)],
        tiled_at_epoch_ms: 0,
    };
    assert!(!state.is_consistent());
}
