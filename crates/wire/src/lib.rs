// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! corral-wire: wire-level message shapes for both daemon endpoints —
//! the newline-delimited JSON ingress socket (C1) and the WebSocket UI
//! subscription hub (C3/C9).

mod client;
mod ingress;
mod server;

pub use client::{BrowserLayout, ClientMessage, TileLayout};
pub use ingress::{decode_line, IngressError, MAX_RECORD_BYTES};
pub use server::{NotificationPayload, ServerMessage, WindowOpOutcome, WorktreeEntry};
