// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! corral-registry: the two serialized-mailbox actors the daemon
//! orchestrator owns — the session registry (C2) and the tile-state model
//! (C5) — plus the reaping checks the registry consults on its timers.

pub mod error;
pub mod focus;
pub mod reap;
pub mod registry;
pub mod tiles;

pub use error::RegistryError;
pub use reap::{ProcessChecker, SystemProcessChecker, SystemTranscriptChecker, TranscriptChecker};
pub use registry::{
    RegistryEvent, RegistryHandle, DEFAULT_PROCESS_VERIFY_INTERVAL, DEFAULT_STALE_REAP_INTERVAL,
    DEFAULT_STALE_THRESHOLD,
};
pub use tiles::{TileCandidate, TileStateHandle};

#[cfg(any(test, feature = "test-support"))]
pub use reap::fake::{FakeProcessChecker, FakeTranscriptChecker};
