// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_through_serde() {
    let id = IdBuf::new("sess-abc123");
    let json = serde_json::to_string(&id).expect("serialize");
    let back: IdBuf = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(id, back);
}

#[test]
fn borrows_as_str_for_map_lookup() {
    use std::collections::HashMap;
    let mut map: HashMap<IdBuf, u32> = HashMap::new();
    map.insert(IdBuf::new("sess-1"), 1);
    assert_eq!(map.get("sess-1"), Some(&1));
}

#[test]
fn short_truncates() {
    assert_eq!(short("hello world", 5), "hello");
    assert_eq!(short("hi", 5), "hi");
}
