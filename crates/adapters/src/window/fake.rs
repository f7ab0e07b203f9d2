// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory window adapter for daemon-level tests, used where there's
//! no real display to talk to.

use super::{WindowAdapter, WindowAdapterError};
use async_trait::async_trait;
use corral_core::{Display, DisplayId, Rect, TerminalKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct State {
    displays: Vec<Display>,
    windows: HashMap<TerminalKey, Rect>,
    frontmost: Vec<TerminalKey>,
    browser_rect: Option<Rect>,
    activated: Vec<TerminalKey>,
    fail_next_position: bool,
}

/// Fake [`WindowAdapter`] with directly inspectable/controllable state,
/// for daemon and registry tests.
#[derive(Clone, Default)]
pub struct FakeWindowAdapter {
    state: Arc<Mutex<State>>,
}

impl FakeWindowAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_displays(&self, displays: Vec<Display>) {
        self.state.lock().displays = displays;
    }

    pub fn single_display(work_area: Rect) -> Vec<Display> {
        vec![Display { id: DisplayId(0), bounds: work_area, work_area, is_primary: true }]
    }

    /// Registers a window at `rect` so [`WindowAdapter::get_window_bounds`]
    /// and the frontmost-candidate list can see it.
    pub fn place_window(&self, terminal_key: TerminalKey, rect: Rect) {
        self.state.lock().windows.insert(terminal_key, rect);
    }

    pub fn set_frontmost(&self, candidates: Vec<TerminalKey>) {
        self.state.lock().frontmost = candidates;
    }

    pub fn browser_rect(&self) -> Option<Rect> {
        self.state.lock().browser_rect
    }

    pub fn activated(&self) -> Vec<TerminalKey> {
        self.state.lock().activated.clone()
    }

    pub fn window_bounds(&self, terminal_key: &TerminalKey) -> Option<Rect> {
        self.state.lock().windows.get(terminal_key).copied()
    }

    /// Makes the next `position_window` call return `NoWindow`, then
    /// resets.
    pub fn fail_next_position(&self) {
        self.state.lock().fail_next_position = true;
    }
}

#[async_trait]
impl WindowAdapter for FakeWindowAdapter {
    async fn enumerate_displays(&self) -> Result<Vec<Display>, WindowAdapterError> {
        Ok(self.state.lock().displays.clone())
    }

    async fn position_window(
        &self,
        terminal_key: &TerminalKey,
        rect: Rect,
    ) -> Result<(), WindowAdapterError> {
        let mut state = self.state.lock();
        if state.fail_next_position {
            state.fail_next_position = false;
            return Err(WindowAdapterError::NoWindow);
        }
        state.windows.insert(terminal_key.clone(), rect);
        Ok(())
    }

    async fn get_window_bounds(
        &self,
        terminal_key: &TerminalKey,
    ) -> Result<Option<Rect>, WindowAdapterError> {
        Ok(self.state.lock().windows.get(terminal_key).copied())
    }

    async fn position_browser_window(&self, rect: Rect) -> Result<(), WindowAdapterError> {
        self.state.lock().browser_rect = Some(rect);
        Ok(())
    }

    async fn activate(&self, terminal_key: &TerminalKey) -> Result<(), WindowAdapterError> {
        self.state.lock().activated.push(terminal_key.clone());
        Ok(())
    }

    async fn frontmost_candidates(&self) -> Vec<TerminalKey> {
        self.state.lock().frontmost.clone()
    }

    fn supports_window_bounds(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
