// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_geometry_token() {
    assert_eq!(parse_geometry_token("1920x1080+0+0"), Some(Rect::new(0, 0, 1920, 1080)));
    assert_eq!(parse_geometry_token("1920x1080+1920+0"), Some(Rect::new(1920, 0, 1920, 1080)));
}

#[test]
fn parses_xdotool_shell_output() {
    let raw = "WINDOW=123\nX=10\nY=20\nWIDTH=300\nHEIGHT=400\nSCREEN=0";
    assert_eq!(parse_getwindowgeometry(raw), Some(Rect::new(10, 20, 300, 400)));
}

#[test]
fn parses_xrandr_connected_primary_line() {
    let raw = "Screen 0: minimum 8 x 8, current 1920 x 1080\nHDMI-1 connected primary 1920x1080+0+0 (normal) 527mm x 296mm";
    let displays = parse_xrandr(raw);
    assert_eq!(displays.len(), 1);
    assert!(displays[0].is_primary);
    assert_eq!(displays[0].bounds, Rect::new(0, 0, 1920, 1080));
}
