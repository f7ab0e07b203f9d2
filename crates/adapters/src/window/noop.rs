// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for platforms/builds with no window-placement capability at
//! all. Every capability reports `Unsupported`; `frontmost_candidates`
//! returns empty. Used as the last-resort fallback so the daemon still
//! starts and serves session telemetry even without a supported adapter.

use super::{WindowAdapter, WindowAdapterError};
use async_trait::async_trait;
use corral_core::{Display, Rect, TerminalKey};

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWindowAdapter;

#[async_trait]
impl WindowAdapter for NoopWindowAdapter {
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn position_window(&self, _: &TerminalKey, _: Rect) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn get_window_bounds(&self, _: &TerminalKey) -> Result<Option<Rect>, WindowAdapterError> {
        Ok(None)
    }

    async fn position_browser_window(&self, _: Rect) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn activate(&self, _: &TerminalKey) -> Result<(), WindowAdapterError> {
        Err(WindowAdapterError::Unsupported)
    }

    async fn frontmost_candidates(&self) -> Vec<TerminalKey> {
        Vec::new()
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
