// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn overlap_of_disjoint_rects_is_zero() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(20, 20, 10, 10);
    assert_eq!(a.overlap(&b), 0);
}

#[test]
fn overlap_of_identical_rects_is_full_area() {
    let a = Rect::new(0, 0, 10, 10);
    assert_eq!(a.overlap(&a), 100);
}

#[test]
fn overlap_of_partial_rects() {
    let a = Rect::new(0, 0, 10, 10);
    let b = Rect::new(5, 5, 10, 10);
    assert_eq!(a.overlap(&b), 25);
}
