// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const WORK_AREA: Rect = Rect::new(0, 23, 1920, 1057);

#[test]
fn grid_spec_matches_spec_table() {
    assert_eq!(grid_spec(0), Vec::<usize>::new());
    assert_eq!(grid_spec(1), vec![1]);
    assert_eq!(grid_spec(2), vec![2]);
    assert_eq!(grid_spec(3), vec![3]);
    assert_eq!(grid_spec(4), vec![2, 2]);
    assert_eq!(grid_spec(5), vec![3, 2]);
    assert_eq!(grid_spec(6), vec![3, 3]);
    assert_eq!(grid_spec(7), vec![4, 3]);
    assert_eq!(grid_spec(8), vec![4, 4]);
}

#[test]
fn grid_progression_1_to_4_matches_worked_example() {
    let slots = calculate_all_slots(WORK_AREA, 4);
    let rects: Vec<Rect> = slots.iter().map(|s| s.rect).collect();
    assert_eq!(
        rects,
        vec![
            Rect::new(0, 23, 960, 528),
            Rect::new(0, 551, 960, 529),
            Rect::new(960, 23, 960, 528),
            Rect::new(960, 551, 960, 529),
        ]
    );
}

#[test]
fn smart_add_3_to_4_repositions_all_three() {
    let existing = calculate_all_slots(WORK_AREA, 3).into_iter().map(|s| s.rect).collect::<Vec<_>>();
    let plan = plan_smart_tile_transition(&existing, WORK_AREA).expect("plan");
    assert_eq!(plan.repositions.len(), 3);
    assert_eq!(plan.new_column, 1);
    assert_eq!(plan.new_row, 1);
    assert_eq!(plan.new_rect, Rect::new(960, 551, 960, 529));
}

#[test]
fn smart_add_5_to_6_repositions_only_bottom_row() {
    let existing = calculate_all_slots(WORK_AREA, 5).into_iter().map(|s| s.rect).collect::<Vec<_>>();
    let plan = plan_smart_tile_transition(&existing, WORK_AREA).expect("plan");
    assert_eq!(plan.repositions.len(), 2);
    for reposition in &plan.repositions {
        assert_eq!(reposition.new_rect.width, 640);
    }
    assert_eq!(plan.new_column, 2);
    assert_eq!(plan.new_row, 1);
}

#[test]
fn transition_plan_is_none_at_capacity() {
    let existing = calculate_all_slots(WORK_AREA, 8).into_iter().map(|s| s.rect).collect::<Vec<_>>();
    assert!(plan_smart_tile_transition(&existing, WORK_AREA).is_none());
}

#[test]
fn free_space_on_empty_area_matches_worked_example() {
    let result = find_free_space(WORK_AREA, &[]);
    assert_eq!(result, Rect::new(0, 23, 480, 529));
}

#[test]
fn free_space_avoids_a_window_covering_the_top_left() {
    let blocker = Rect::new(0, 23, 960, 528);
    let result = find_free_space(WORK_AREA, &[blocker]);
    assert_eq!(blocker.overlap(&result), 0);
}

#[test]
fn slots_are_disjoint_and_cover_the_work_area() {
    for n in 0..=8 {
        let slots = calculate_all_slots(WORK_AREA, n);
        assert_eq!(slots.len(), n);

        for i in 0..slots.len() {
            for j in (i + 1)..slots.len() {
                assert_eq!(slots[i].rect.overlap(&slots[j].rect), 0, "n={n} slots {i} and {j} overlap");
            }
        }

        let total_area: i64 = slots.iter().map(|s| s.rect.area()).sum();
        assert_eq!(total_area, WORK_AREA.area(), "n={n} slot union doesn't cover work area");
    }
}
