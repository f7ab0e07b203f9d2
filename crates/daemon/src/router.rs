// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request router (C9): dispatches every client request to the registry,
//! tile-state model, window adapter, and the external-collaborator
//! adapters (worktree management, session launching), producing the
//! matching `*_result`. Grounded on the teacher's `oj-engine::runtime`
//! handler-per-message-family dispatch, generalized from job/worker/crew
//! operations to session/tile/worktree operations.

use corral_adapters::launcher::{LauncherError, SessionLauncher};
use corral_adapters::window::WindowAdapter;
use corral_adapters::worktree::{WorktreeAdapter, WorktreeError, WorktreeInfo};
use corral_config::{AutocompactStore, NotificationStore};
use corral_core::{DisplayId, NotificationSettings, Rect, SessionId};
use corral_layout::{calculate_all_slots, find_free_space, plan_smart_tile_transition};
use corral_registry::{RegistryHandle, TileCandidate, TileStateHandle};
use corral_wire::{BrowserLayout, ClientMessage, ServerMessage, TileLayout, WindowOpOutcome, WorktreeEntry};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::hub::HubBroadcast;

/// Delay enforced between successive window-adapter calls within one
/// multi-window request, per spec.md §4.9.
const INTER_CALL_DELAY: Duration = Duration::from_millis(100);

fn worktree_entry(info: WorktreeInfo) -> WorktreeEntry {
    WorktreeEntry { path: info.path, branch: info.branch, base_branch: info.base_branch }
}

/// Everything the router needs to carry out a request. Held behind an
/// `Arc` so the hub can clone it cheaply per connection.
pub struct Router {
    pub registry: RegistryHandle,
    pub tiles: TileStateHandle,
    pub window_adapter: Arc<dyn WindowAdapter>,
    pub worktree_adapter: Arc<dyn WorktreeAdapter>,
    pub launcher: Arc<dyn SessionLauncher>,
    pub autocompact_store: AutocompactStore,
    pub notification_store: NotificationStore,
    pub broadcasts: broadcast::Sender<HubBroadcast>,
}

impl Router {
    /// Dispatches one request, returning the reply addressed to the
    /// requesting client, or `None` for requests that only produce a
    /// broadcast (`select_session`).
    pub async fn dispatch(&self, request: ClientMessage) -> Option<ServerMessage> {
        match request {
            ClientMessage::SelectSession { session_id } => {
                let _ = self.registry.set_focus(Some(session_id)).await;
                None
            }
            ClientMessage::FocusTerminal { session_id } => Some(self.focus_terminal(session_id).await),
            ClientMessage::TileWindows { session_ids, layout, display_id } => {
                Some(self.tile_windows(session_ids, layout, display_id).await)
            }
            ClientMessage::MaximizeWindow { session_id, display_id } => {
                Some(self.maximize_window(session_id, display_id).await)
            }
            ClientMessage::PositionBrowserLayout { session_ids, layout } => {
                Some(self.position_browser_layout(session_ids, layout).await)
            }
            ClientMessage::SmartTileAdd { launch_cwd, new_session_id, display_id, dangerously_skip_permissions } => {
                Some(self.smart_tile_add(launch_cwd, new_session_id, display_id, dangerously_skip_permissions).await)
            }
            ClientMessage::CreateWorktree { repo_root, name, base_branch, launch_session, dangerously_skip_permissions } => {
                Some(self.create_worktree(repo_root, name, base_branch, launch_session, dangerously_skip_permissions).await)
            }
            ClientMessage::ListWorktrees { repo_root } => Some(self.list_worktrees(repo_root).await),
            ClientMessage::RemoveWorktree { repo_root, name } => Some(self.remove_worktree(repo_root, name).await),
            ClientMessage::LaunchSession { cwd, preferred_terminal, dangerously_skip_permissions } => {
                Some(self.launch_session(cwd, preferred_terminal, dangerously_skip_permissions).await)
            }
            ClientMessage::ToggleAutocompact { enabled } => Some(self.toggle_autocompact(enabled).await),
            ClientMessage::UpdateNotificationSettings { settings } => {
                Some(self.update_notification_settings(settings).await)
            }
        }
    }

    async fn focus_terminal(&self, session_id: SessionId) -> ServerMessage {
        let Ok(Some(session)) = self.registry.get(session_id.clone()).await else {
            return ServerMessage::FocusTerminalResult {
                session_id,
                method: "activate".to_string(),
                success: false,
                error: Some("unknown session".to_string()),
            };
        };
        match self.window_adapter.activate(&session.terminal_key).await {
            Ok(()) => ServerMessage::FocusTerminalResult {
                session_id,
                method: "activate".to_string(),
                success: true,
                error: None,
            },
            Err(e) => ServerMessage::FocusTerminalResult {
                session_id,
                method: "activate".to_string(),
                success: false,
                error: Some(e.to_string()),
            },
        }
    }

    async fn tile_windows(
        &self,
        session_ids: Vec<SessionId>,
        _layout: Option<TileLayout>,
        display_id: Option<DisplayId>,
    ) -> ServerMessage {
        let mut candidates = Vec::with_capacity(session_ids.len());
        let mut outcomes = Vec::with_capacity(session_ids.len());
        for session_id in &session_ids {
            match self.registry.get(session_id.clone()).await {
                Ok(Some(session)) => {
                    candidates.push(TileCandidate { session_id: session_id.clone(), terminal_key: session.terminal_key })
                }
                _ => outcomes.push(WindowOpOutcome {
                    session_id: session_id.clone(),
                    success: false,
                    error: Some("unknown session".to_string()),
                }),
            }
        }

        let display = self.resolve_display(display_id).await;
        let slots = calculate_all_slots(display.work_area, candidates.len());

        for (candidate, slot) in candidates.iter().zip(slots.iter()) {
            let result = self.window_adapter.position_window(&candidate.terminal_key, slot.rect).await;
            outcomes.push(WindowOpOutcome {
                session_id: candidate.session_id.clone(),
                success: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            });
            tokio::time::sleep(INTER_CALL_DELAY).await;
        }

        if !candidates.is_empty() {
            let _ = self.tiles.build_from_manual_tile(display.id, display.work_area, candidates).await;
        }

        ServerMessage::TileWindowsResult { outcomes }
    }

    async fn maximize_window(&self, session_id: SessionId, display_id: Option<DisplayId>) -> ServerMessage {
        let Ok(Some(session)) = self.registry.get(session_id.clone()).await else {
            return ServerMessage::MaximizeWindowResult {
                session_id,
                success: false,
                error: Some("unknown session".to_string()),
            };
        };
        let display = self.resolve_display(display_id).await;
        match self.window_adapter.position_window(&session.terminal_key, display.work_area).await {
            Ok(()) => ServerMessage::MaximizeWindowResult { session_id, success: true, error: None },
            Err(e) => ServerMessage::MaximizeWindowResult { session_id, success: false, error: Some(e.to_string()) },
        }
    }

    async fn position_browser_layout(&self, session_ids: Vec<SessionId>, layout: BrowserLayout) -> ServerMessage {
        let display = self.resolve_display(None).await;
        let work_area = display.work_area;

        let browser_width = work_area.width / 3;
        let browser_rect = Rect::new(work_area.x, work_area.y, browser_width, work_area.height);
        let terminal_area =
            Rect::new(work_area.x + browser_width, work_area.y, work_area.width - browser_width, work_area.height);
        let terminal_slots = match layout {
            BrowserLayout::BrowserTerminal => calculate_all_slots(terminal_area, session_ids.len().min(1)),
            BrowserLayout::BrowserTwoTerminals => calculate_all_slots(terminal_area, session_ids.len()),
        };

        let mut outcomes = Vec::with_capacity(session_ids.len());
        let browser_result = self.window_adapter.position_browser_window(browser_rect).await;
        if let Err(e) = &browser_result {
            tracing::warn!(error = %e, "position_browser_layout: browser window positioning failed");
        }
        tokio::time::sleep(INTER_CALL_DELAY).await;

        for (session_id, slot) in session_ids.iter().zip(terminal_slots.iter()) {
            let Ok(Some(session)) = self.registry.get(session_id.clone()).await else {
                outcomes.push(WindowOpOutcome {
                    session_id: session_id.clone(),
                    success: false,
                    error: Some("unknown session".to_string()),
                });
                continue;
            };
            let result = self.window_adapter.position_window(&session.terminal_key, slot.rect).await;
            outcomes.push(WindowOpOutcome {
                session_id: session_id.clone(),
                success: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            });
            tokio::time::sleep(INTER_CALL_DELAY).await;
        }

        ServerMessage::PositionBrowserLayoutResult { outcomes }
    }

    /// Steps 1-6 of spec.md §4.9's smart tile add algorithm, verbatim.
    async fn smart_tile_add(
        &self,
        launch_cwd: Option<std::path::PathBuf>,
        new_session_id: Option<SessionId>,
        display_id: Option<DisplayId>,
        dangerously_skip_permissions: Option<bool>,
    ) -> ServerMessage {
        // Step 1: pick target display.
        let display = self.resolve_smart_add_display(display_id).await;

        // Step 2: read + validate existing tile state for that display.
        let existing_state = self.tiles.get(display.id).await.ok().flatten();
        let valid = match &existing_state {
            Some(_) => self.tiles.validate(display.id).await.unwrap_or(false),
            None => false,
        };

        let usable_state = existing_state.filter(|s| valid && s.slots.len() < corral_layout::MAX_TILED);

        let (target_rect, repositioned, used_free_space, new_total) = if let Some(state) = &usable_state {
            // Step 3: plan the transition.
            let existing_rects: Vec<Rect> = state.slots.iter().map(|s| s.rect).collect();
            match plan_smart_tile_transition(&existing_rects, display.work_area) {
                Some(plan) => {
                    // Step 4: execute repositions with a 100ms inter-call delay.
                    let mut success_count = 0usize;
                    for reposition in &plan.repositions {
                        let slot = &state.slots[reposition.slot_index];
                        if self.window_adapter.position_window(&slot.terminal_key, reposition.new_rect).await.is_ok() {
                            success_count += 1;
                        }
                        tokio::time::sleep(INTER_CALL_DELAY).await;
                    }

                    let mut candidates: Vec<TileCandidate> = state
                        .slots
                        .iter()
                        .map(|s| TileCandidate { session_id: s.session_id.clone(), terminal_key: s.terminal_key.clone() })
                        .collect();
                    if let Some(session_id) = &new_session_id {
                        if let Ok(Some(session)) = self.registry.get(session_id.clone()).await {
                            candidates.push(TileCandidate {
                                session_id: session_id.clone(),
                                terminal_key: session.terminal_key,
                            });
                        }
                    }
                    let _ = self.tiles.build_from_manual_tile(display.id, display.work_area, candidates).await;

                    (plan.new_rect, success_count, false, state.slots.len() + 1)
                }
                None => self.smart_tile_add_free_space(&display, state.slots.len()).await,
            }
        } else {
            // Step 5: free-space path.
            self.smart_tile_add_free_space(&display, usable_state.as_ref().map(|s| s.slots.len()).unwrap_or(0)).await
        };

        // Step 6: invoke the launcher, or reposition an already-known session.
        if let Some(cwd) = launch_cwd {
            match self.launcher.launch(&cwd, None, Some(target_rect), dangerously_skip_permissions.unwrap_or(false)).await
            {
                Ok(method) => ServerMessage::SmartTileAddResult {
                    success: true,
                    repositioned,
                    total_tiled: new_total,
                    used_free_space,
                    launch_method: Some(method),
                    error: None,
                },
                Err(e) => ServerMessage::SmartTileAddResult {
                    success: false,
                    repositioned,
                    total_tiled: new_total,
                    used_free_space,
                    launch_method: None,
                    error: Some(launcher_error_string(&e)),
                },
            }
        } else if let Some(session_id) = new_session_id {
            let Ok(Some(session)) = self.registry.get(session_id).await else {
                return ServerMessage::SmartTileAddResult {
                    success: false,
                    repositioned,
                    total_tiled: new_total,
                    used_free_space,
                    launch_method: None,
                    error: Some("unknown session".to_string()),
                };
            };
            match self.window_adapter.position_window(&session.terminal_key, target_rect).await {
                Ok(()) => ServerMessage::SmartTileAddResult {
                    success: true,
                    repositioned,
                    total_tiled: new_total,
                    used_free_space,
                    launch_method: None,
                    error: None,
                },
                Err(e) => ServerMessage::SmartTileAddResult {
                    success: false,
                    repositioned,
                    total_tiled: new_total,
                    used_free_space,
                    launch_method: None,
                    error: Some(e.to_string()),
                },
            }
        } else {
            ServerMessage::SmartTileAddResult {
                success: true,
                repositioned,
                total_tiled: new_total,
                used_free_space,
                launch_method: None,
                error: None,
            }
        }
    }

    async fn smart_tile_add_free_space(
        &self,
        display: &corral_core::Display,
        existing_count: usize,
    ) -> (Rect, usize, bool, usize) {
        let existing_rects = if self.window_adapter.supports_window_bounds() {
            let mut rects = Vec::new();
            if let Some(state) = self.tiles.get(display.id).await.ok().flatten() {
                for slot in &state.slots {
                    if let Ok(Some(rect)) = self.window_adapter.get_window_bounds(&slot.terminal_key).await {
                        rects.push(rect);
                    }
                }
            }
            rects
        } else {
            self.tiles
                .get(display.id)
                .await
                .ok()
                .flatten()
                .map(|state| state.slots.iter().map(|s| s.rect).collect())
                .unwrap_or_default()
        };

        let target = find_free_space(display.work_area, &existing_rects);
        (target, 0, true, existing_count)
    }

    /// Display resolution for `smart_tile_add`'s step 1: explicit
    /// `display_id` wins, then the display already holding tile state,
    /// then the majority display of live terminals (when the adapter can
    /// report bounds), then the primary display.
    async fn resolve_smart_add_display(&self, display_id: Option<DisplayId>) -> corral_core::Display {
        let displays = self.window_adapter.enumerate_displays().await.unwrap_or_default();

        if let Some(id) = display_id {
            if let Some(d) = displays.iter().find(|d| d.id == id) {
                return *d;
            }
        }

        if let Some(state) = self.tiles.any().await.ok().flatten() {
            if let Some(d) = displays.iter().find(|d| d.id == state.display_id) {
                return *d;
            }
        }

        if self.window_adapter.supports_window_bounds() {
            if let Some(d) = self.majority_display(&displays).await {
                return d;
            }
        }

        displays
            .iter()
            .find(|d| d.is_primary)
            .copied()
            .or_else(|| displays.first().copied())
            .unwrap_or_else(|| corral_core::Display {
                id: DisplayId(0),
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1080),
                is_primary: true,
            })
    }

    /// `tile_windows`/`maximize_window`/`position_browser_layout`'s
    /// simpler display resolution: explicit `display_id`, else primary.
    async fn resolve_display(&self, display_id: Option<DisplayId>) -> corral_core::Display {
        let displays = self.window_adapter.enumerate_displays().await.unwrap_or_default();
        if let Some(id) = display_id {
            if let Some(d) = displays.iter().find(|d| d.id == id) {
                return *d;
            }
        }
        displays
            .iter()
            .find(|d| d.is_primary)
            .copied()
            .or_else(|| displays.first().copied())
            .unwrap_or_else(|| corral_core::Display {
                id: DisplayId(0),
                bounds: Rect::new(0, 0, 1920, 1080),
                work_area: Rect::new(0, 0, 1920, 1080),
                is_primary: true,
            })
    }

    async fn majority_display(&self, displays: &[corral_core::Display]) -> Option<corral_core::Display> {
        let sessions = self.registry.all().await.ok()?;
        let mut counts = vec![0usize; displays.len()];
        for session in &sessions {
            if let Ok(Some(bounds)) = self.window_adapter.get_window_bounds(&session.terminal_key).await {
                if let Some((idx, _)) = displays
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, d)| d.work_area.overlap(&bounds))
                {
                    counts[idx] += 1;
                }
            }
        }
        counts.iter().enumerate().max_by_key(|(_, c)| **c).map(|(idx, _)| displays[idx])
    }

    async fn create_worktree(
        &self,
        repo_root: std::path::PathBuf,
        name: String,
        base_branch: Option<String>,
        launch_session: Option<bool>,
        dangerously_skip_permissions: Option<bool>,
    ) -> ServerMessage {
        match self.worktree_adapter.create(&repo_root, &name, base_branch.as_deref()).await {
            Ok(info) => {
                if launch_session != Some(false) {
                    let _ = self
                        .smart_tile_add(Some(info.path.clone()), None, None, dangerously_skip_permissions)
                        .await;
                }
                ServerMessage::CreateWorktreeResult { success: true, worktree: Some(worktree_entry(info)), error: None }
            }
            Err(e) => ServerMessage::CreateWorktreeResult { success: false, worktree: None, error: Some(worktree_error_string(&e)) },
        }
    }

    async fn list_worktrees(&self, repo_root: std::path::PathBuf) -> ServerMessage {
        let worktrees = self.worktree_adapter.list(&repo_root).await.unwrap_or_default();
        ServerMessage::ListWorktreesResult { worktrees: worktrees.into_iter().map(worktree_entry).collect() }
    }

    async fn remove_worktree(&self, repo_root: std::path::PathBuf, name: String) -> ServerMessage {
        match self.worktree_adapter.remove(&repo_root, &name).await {
            Ok(()) => ServerMessage::RemoveWorktreeResult { success: true, error: None },
            Err(e) => ServerMessage::RemoveWorktreeResult { success: false, error: Some(worktree_error_string(&e)) },
        }
    }

    async fn launch_session(
        &self,
        cwd: std::path::PathBuf,
        preferred_terminal: Option<String>,
        dangerously_skip_permissions: Option<bool>,
    ) -> ServerMessage {
        match self
            .launcher
            .launch(&cwd, preferred_terminal.as_deref(), None, dangerously_skip_permissions.unwrap_or(false))
            .await
        {
            Ok(_method) => ServerMessage::LaunchSessionResult { success: true, error: None },
            Err(e) => ServerMessage::LaunchSessionResult { success: false, error: Some(launcher_error_string(&e)) },
        }
    }

    async fn toggle_autocompact(&self, enabled: bool) -> ServerMessage {
        let result = self.autocompact_store.write(corral_core::AutocompactSettings { enabled });
        let warning = result.err().map(|e| e.to_string());
        // Live sessions echo this in their own `autocompact` field (spec
        // §3/§4.9); registry emits a `SessionUpdated` per changed session,
        // which the hub relays as a `session_update` broadcast.
        let _ = self.registry.set_autocompact(enabled).await;
        let _ = self.broadcasts.send(HubBroadcast::AutocompactToggled { enabled, warning: warning.clone() });
        ServerMessage::ToggleAutocompactResult { enabled }
    }

    async fn update_notification_settings(&self, settings: NotificationSettings) -> ServerMessage {
        let _ = self.notification_store.write(settings);
        ServerMessage::UpdateNotificationSettingsResult { settings }
    }
}

fn launcher_error_string(e: &LauncherError) -> String {
    e.to_string()
}

fn worktree_error_string(e: &WorktreeError) -> String {
    e.to_string()
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
