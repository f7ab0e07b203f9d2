// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Geometry primitives shared between the layout engine, the window
//! adapters, and the daemon's tile-state model.

use serde::{Deserialize, Serialize};

/// An axis-aligned pixel rectangle. `width`/`height` are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// Pixel overlap area between two rectangles.
    pub fn overlap(&self, other: &Rect) -> i64 {
        let dx = (self.right().min(other.right()) - self.x.max(other.x)).max(0);
        let dy = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0);
        dx as i64 * dy as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u32);

/// One physical display, as enumerated by a window adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub id: DisplayId,
    pub bounds: Rect,
    pub work_area: Rect,
    pub is_primary: bool,
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
