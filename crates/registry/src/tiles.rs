// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tile-state actor (C5): the daemon's belief about how windows are
//! currently arranged on each display. A second serialized mailbox,
//! independently owned from [`crate::registry`] per the single-owner
//! principle those two components share — the registry never reaches into
//! tile state directly, and this actor never reaches into the registry;
//! the daemon orchestrator is the only thing that calls both.

use crate::error::RegistryError;
use corral_adapters::window::WindowAdapter;
use corral_core::{Clock, DisplayId, Rect, SessionId, TerminalKey, TileState, TiledSlot};
use corral_layout::calculate_all_slots;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// One session to place, as the caller's registry view supplies it.
#[derive(Debug, Clone)]
pub struct TileCandidate {
    pub session_id: SessionId,
    pub terminal_key: TerminalKey,
}

enum TileMessage {
    Get { display_id: DisplayId, respond: oneshot::Sender<Option<TileState>> },
    Any { respond: oneshot::Sender<Option<TileState>> },
    Set { display_id: DisplayId, state: TileState, respond: oneshot::Sender<()> },
    Clear { display_id: DisplayId, respond: oneshot::Sender<()> },
    ClearAll { respond: oneshot::Sender<()> },
    RemoveSession { session_id: SessionId, respond: oneshot::Sender<()> },
    BuildFromManualTile {
        display_id: DisplayId,
        work_area: Rect,
        sessions: Vec<TileCandidate>,
        respond: oneshot::Sender<TileState>,
    },
    Validate { display_id: DisplayId, respond: oneshot::Sender<bool> },
}

/// Cheaply-cloneable handle to a running tile-state actor.
#[derive(Clone)]
pub struct TileStateHandle {
    sender: mpsc::UnboundedSender<TileMessage>,
}

impl TileStateHandle {
    async fn call<T>(&self, make_msg: impl FnOnce(oneshot::Sender<T>) -> TileMessage) -> Result<T, RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(make_msg(tx)).map_err(|_| RegistryError::Closed)?;
        rx.await.map_err(|_| RegistryError::Closed)
    }

    pub async fn get(&self, display_id: DisplayId) -> Result<Option<TileState>, RegistryError> {
        self.call(|respond| TileMessage::Get { display_id, respond }).await
    }

    /// Returns whichever tiled display is found first, for callers that
    /// don't know (or don't care) which display holds the tiled windows.
    pub async fn any(&self) -> Result<Option<TileState>, RegistryError> {
        self.call(TileMessage::Any).await
    }

    pub async fn set(&self, display_id: DisplayId, state: TileState) -> Result<(), RegistryError> {
        self.call(|respond| TileMessage::Set { display_id, state, respond }).await
    }

    pub async fn clear(&self, display_id: DisplayId) -> Result<(), RegistryError> {
        self.call(|respond| TileMessage::Clear { display_id, respond }).await
    }

    pub async fn clear_all(&self) -> Result<(), RegistryError> {
        self.call(TileMessage::ClearAll).await
    }

    /// Removes `session_id` from whichever display's tile state holds it,
    /// compacting the remaining sessions onto a freshly computed grid for
    /// the smaller count. Issues no window-placement calls; it only
    /// updates the model.
    pub async fn remove_session(&self, session_id: SessionId) -> Result<(), RegistryError> {
        self.call(|respond| TileMessage::RemoveSession { session_id, respond }).await
    }

    /// Replaces `display_id`'s tile state with a freshly computed grid for
    /// `sessions.len()` slots, assigning sessions to slots in the order
    /// given.
    pub async fn build_from_manual_tile(
        &self,
        display_id: DisplayId,
        work_area: Rect,
        sessions: Vec<TileCandidate>,
    ) -> Result<TileState, RegistryError> {
        self.call(|respond| TileMessage::BuildFromManualTile { display_id, work_area, sessions, respond }).await
    }

    /// Checks `display_id`'s recorded tile state against the live window
    /// adapter (bounds-based) or the live session set (existence-based),
    /// per [`WindowAdapter::supports_window_bounds`]. A display with no
    /// recorded tile state is trivially valid (there's nothing to
    /// contradict it), so callers should still check [`TileStateHandle::get`]
    /// before treating an empty result as "go ahead and tile".
    pub async fn validate(&self, display_id: DisplayId) -> Result<bool, RegistryError> {
        self.call(|respond| TileMessage::Validate { display_id, respond }).await
    }
}

fn build_state<C: Clock>(clock: &C, display_id: DisplayId, work_area: Rect, sessions: &[TileCandidate]) -> TileState {
    let slots = calculate_all_slots(work_area, sessions.len());
    let tiled_slots = slots
        .into_iter()
        .zip(sessions.iter())
        .map(|(slot, candidate)| TiledSlot {
            terminal_key: candidate.terminal_key.clone(),
            session_id: candidate.session_id.clone(),
            rect: slot.rect,
            column: slot.column,
            row: slot.row,
        })
        .collect();

    TileState {
        display_id,
        work_area,
        columns_per_row: corral_layout::grid_spec(sessions.len()),
        slots: tiled_slots,
        tiled_at_epoch_ms: clock.epoch_ms(),
    }
}

/// Reassigns slots for `n` sessions using column-major slot order, keeping
/// the sessions' relative order, without touching the window adapter.
fn recompute_grid<C: Clock>(clock: &C, state: &TileState, surviving: &[TiledSlot]) -> TileState {
    let candidates: Vec<TileCandidate> = surviving
        .iter()
        .map(|s| TileCandidate { session_id: s.session_id.clone(), terminal_key: s.terminal_key.clone() })
        .collect();
    build_state(clock, state.display_id, state.work_area, &candidates)
}

struct Actor<C: Clock, W: WindowAdapter> {
    clock: C,
    window_adapter: Arc<W>,
    live_sessions: Arc<dyn Fn(&SessionId) -> bool + Send + Sync>,
    states: HashMap<DisplayId, TileState>,
}

const BOUNDS_TOLERANCE_PX: i32 = 50;

impl<C: Clock, W: WindowAdapter> Actor<C, W> {
    fn remove_session(&mut self, session_id: &SessionId) {
        let mut updates = Vec::new();
        for (display_id, state) in self.states.iter() {
            if !state.contains_session(session_id) {
                continue;
            }
            let surviving: Vec<TiledSlot> =
                state.slots.iter().filter(|s| &s.session_id != session_id).cloned().collect();
            updates.push((*display_id, surviving));
        }

        for (display_id, surviving) in updates {
            if surviving.is_empty() {
                self.states.remove(&display_id);
                continue;
            }
            if let Some(state) = self.states.get(&display_id) {
                let new_state = recompute_grid(&self.clock, state, &surviving);
                self.states.insert(display_id, new_state);
            }
        }
    }

    async fn validate(&self, display_id: DisplayId) -> bool {
        let Some(state) = self.states.get(&display_id) else { return true };

        if self.window_adapter.supports_window_bounds() {
            for slot in &state.slots {
                match self.window_adapter.get_window_bounds(&slot.terminal_key).await {
                    Ok(Some(actual)) => {
                        if !within_tolerance(&actual, &slot.rect, BOUNDS_TOLERANCE_PX) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
            true
        } else {
            state.slots.iter().all(|slot| (self.live_sessions)(&slot.session_id))
        }
    }
}

fn within_tolerance(actual: &Rect, expected: &Rect, tolerance: i32) -> bool {
    (actual.x - expected.x).abs() <= tolerance
        && (actual.y - expected.y).abs() <= tolerance
        && (actual.width - expected.width).abs() <= tolerance
        && (actual.height - expected.height).abs() <= tolerance
}

/// Spawns the tile-state actor.
///
/// `live_sessions` is consulted by session-existence-based validation; it
/// should be a cheap, non-blocking closure (the daemon orchestrator
/// typically backs it with a snapshot taken just before calling
/// [`TileStateHandle::validate`], not a live registry round-trip, since
/// this actor must stay decoupled from the registry's own mailbox).
pub fn spawn<C, W>(
    clock: C,
    window_adapter: Arc<W>,
    live_sessions: impl Fn(&SessionId) -> bool + Send + Sync + 'static,
) -> TileStateHandle
where
    C: Clock + 'static,
    W: WindowAdapter + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<TileMessage>();

    let mut actor = Actor {
        clock,
        window_adapter,
        live_sessions: Arc::new(live_sessions),
        states: HashMap::new(),
    };

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                TileMessage::Get { display_id, respond } => {
                    let _ = respond.send(actor.states.get(&display_id).cloned());
                }
                TileMessage::Any { respond } => {
                    let _ = respond.send(actor.states.values().next().cloned());
                }
                TileMessage::Set { display_id, state, respond } => {
                    actor.states.insert(display_id, state);
                    let _ = respond.send(());
                }
                TileMessage::Clear { display_id, respond } => {
                    actor.states.remove(&display_id);
                    let _ = respond.send(());
                }
                TileMessage::ClearAll { respond } => {
                    actor.states.clear();
                    let _ = respond.send(());
                }
                TileMessage::RemoveSession { session_id, respond } => {
                    actor.remove_session(&session_id);
                    let _ = respond.send(());
                }
                TileMessage::BuildFromManualTile { display_id, work_area, sessions, respond } => {
                    let state = build_state(&actor.clock, display_id, work_area, &sessions);
                    actor.states.insert(display_id, state.clone());
                    let _ = respond.send(state);
                }
                TileMessage::Validate { display_id, respond } => {
                    let valid = actor.validate(display_id).await;
                    let _ = respond.send(valid);
                }
            }
        }
    });

    TileStateHandle { sender: tx }
}

#[cfg(test)]
#[path = "tiles_tests.rs"]
mod tests;
