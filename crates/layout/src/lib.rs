// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure window-tiling layout engine.
//!
//! No I/O, no clocks, no platform calls — every function here is a total,
//! deterministic function of its inputs so it can be exhaustively tested
//! with property-based tests instead of integration tests.

#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use corral_core::Rect;
use serde::{Deserialize, Serialize};

/// Maximum number of sessions the grid layouts in this module support.
/// Above this count, callers fall back to the free-space finder.
pub const MAX_TILED: usize = 8;

/// Column counts for each row of a grid holding `n` windows. Row 0 is the
/// top row.
pub fn grid_spec(n: usize) -> Vec<usize> {
    match n {
        0 => vec![],
        1 => vec![1],
        2 => vec![2],
        3 => vec![3],
        n => {
            let first = n.div_ceil(2);
            let second = n - first;
            if second == 0 {
                vec![first]
            } else {
                vec![first, second]
            }
        }
    }
}

/// One grid cell: its column/row coordinates and pixel geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSlot {
    pub column: usize,
    pub row: usize,
    pub rect: Rect,
}

/// Computes slot geometry for a grid, in column-major order: iterate
/// columns left-to-right over `max(columns_per_row)`, and within each
/// column iterate rows top-to-bottom, emitting a slot iff that (row, col)
/// exists in the grid.
pub fn calculate_all_slots(work_area: Rect, n: usize) -> Vec<GridSlot> {
    let grid = grid_spec(n);
    slots_for_grid(work_area, &grid)
}

fn slots_for_grid(work_area: Rect, columns_per_row: &[usize]) -> Vec<GridSlot> {
    let rows = columns_per_row.len();
    if rows == 0 {
        return vec![];
    }

    let row_height = work_area.height / rows as i32;
    let row_geometry: Vec<(i32, i32)> = (0..rows)
        .map(|r| {
            let y = work_area.y + row_height * r as i32;
            let height =
                if r == rows - 1 { work_area.height - row_height * (rows as i32 - 1) } else { row_height };
            (y, height)
        })
        .collect();

    let max_cols = columns_per_row.iter().copied().max().unwrap_or(0);
    let mut out = Vec::with_capacity(columns_per_row.iter().sum());

    for col in 0..max_cols {
        for (row, &cols_in_row) in columns_per_row.iter().enumerate() {
            if col >= cols_in_row {
                continue;
            }
            let col_width = work_area.width / cols_in_row as i32;
            let x = work_area.x + col_width * col as i32;
            let width = if col == cols_in_row - 1 {
                work_area.width - col_width * (cols_in_row as i32 - 1)
            } else {
                col_width
            };
            let (y, height) = row_geometry[row];
            out.push(GridSlot { column: col, row, rect: Rect::new(x, y, width, height) });
        }
    }

    out
}

/// One window that needs to move as part of a smart-tile-add transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reposition {
    /// Index into the caller's `existing_slots` list that this reposition
    /// applies to.
    pub slot_index: usize,
    pub new_rect: Rect,
}

/// Output of [`plan_smart_tile_transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionPlan {
    pub repositions: Vec<Reposition>,
    pub new_rect: Rect,
    pub new_column: usize,
    pub new_row: usize,
    pub new_grid: Vec<usize>,
}

/// Plans a smart-tile-add transition from `existing_slots.len()` windows to
/// `existing_slots.len() + 1`. Returns `None` when the result would exceed [`MAX_TILED`].
///
/// Existing slot `i` maps onto new-grid slot `i` in column-major order —
/// this is a purely positional mapping, not one keyed by session identity;
/// the caller is responsible for keeping its own session-to-slot bookkeeping
/// in step with whichever rects actually moved.
pub fn plan_smart_tile_transition(existing_slots: &[Rect], work_area: Rect) -> Option<TransitionPlan> {
    let n = existing_slots.len();
    if n >= MAX_TILED {
        return None;
    }

    let new_grid = grid_spec(n + 1);
    let new_slots = slots_for_grid(work_area, &new_grid);

    let mut repositions = Vec::new();
    for (i, existing_rect) in existing_slots.iter().enumerate() {
        let new_rect = new_slots[i].rect;
        if new_rect != *existing_rect {
            repositions.push(Reposition { slot_index: i, new_rect });
        }
    }

    let new_slot = &new_slots[n];
    Some(TransitionPlan {
        repositions,
        new_rect: new_slot.rect,
        new_column: new_slot.column,
        new_row: new_slot.row,
        new_grid,
    })
}

/// Candidate scan resolution for [`find_free_space`]: 8 columns by 4 rows.
const SCAN_COLUMNS: usize = 8;
const SCAN_ROWS: usize = 4;

fn round_div(numerator: i32, denominator: i32) -> i32 {
    ((numerator as f64) / (denominator as f64)).round() as i32
}

/// Finds a placement rectangle that overlaps existing windows as little as
/// possible. The candidate size
/// is always `(work_area.width / 4, work_area.height / 2)`, rounded to the
/// nearest pixel (not floored — a `1057`-tall work area produces a
/// `529`-tall candidate, `1057 / 2` rounded up from `528.5`).
///
/// Scans an 8x4 grid of candidate origins spread evenly across the placeable
/// range (`work_area` dimension minus candidate dimension) so every
/// candidate rect stays within the work area. Ties are broken by scan order
/// (columns outer, rows inner); the first zero-overlap candidate found
/// short-circuits the scan.
pub fn find_free_space(work_area: Rect, existing_windows: &[Rect]) -> Rect {
    let candidate_w = round_div(work_area.width, 4);
    let candidate_h = round_div(work_area.height, 2);

    if existing_windows.is_empty() {
        return Rect::new(work_area.x, work_area.y, candidate_w, candidate_h);
    }

    let range_x = (work_area.width - candidate_w).max(0);
    let range_y = (work_area.height - candidate_h).max(0);
    let step_x = if SCAN_COLUMNS > 1 { range_x as f64 / (SCAN_COLUMNS - 1) as f64 } else { 0.0 };
    let step_y = if SCAN_ROWS > 1 { range_y as f64 / (SCAN_ROWS - 1) as f64 } else { 0.0 };

    let mut best: Option<(i64, Rect)> = None;

    for col in 0..SCAN_COLUMNS {
        for row in 0..SCAN_ROWS {
            let origin_x = work_area.x + (col as f64 * step_x).round() as i32;
            let origin_y = work_area.y + (row as f64 * step_y).round() as i32;
            let candidate = Rect::new(origin_x, origin_y, candidate_w, candidate_h);
            let total_overlap: i64 = existing_windows.iter().map(|w| candidate.overlap(w)).sum();

            if total_overlap == 0 {
                return candidate;
            }

            let is_better = match best {
                Some((best_overlap, _)) => total_overlap < best_overlap,
                None => true,
            };
            if is_better {
                best = Some((total_overlap, candidate));
            }
        }
    }

    best.map(|(_, rect)| rect).unwrap_or(Rect::new(work_area.x, work_area.y, candidate_w, candidate_h))
}

#[cfg(test)]
#[path = "property_tests.rs"]
mod property_tests;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
