// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_pid_from_plain_key() {
    let key = TerminalKey::new("PID:1234");
    assert_eq!(key.kind(), TerminalKeyKind::Pid);
    assert_eq!(key.pid(), Some(1234));
}

#[test]
fn parses_pid_from_conpty() {
    assert_eq!(TerminalKey::new("CONPTY:987").pid(), Some(987));
}

#[test]
fn strips_discovered_prefix_before_kind_lookup() {
    let key = TerminalKey::new("DISCOVERED:PID:42");
    assert!(key.is_discovered());
    assert_eq!(key.kind(), TerminalKeyKind::Pid);
    assert_eq!(key.pid(), Some(42));
}

#[test]
fn tty_and_iterm_have_no_pid() {
    assert_eq!(TerminalKey::new("TTY:/dev/ttys003").pid(), None);
    assert_eq!(TerminalKey::new("ITERM:abc-def").kind(), TerminalKeyKind::Iterm);
}
