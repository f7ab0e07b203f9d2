// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription hub (C3): a loopback WebSocket endpoint every UI client
//! connects to. Each client gets `initial_state` as its first message,
//! then every subsequent `RegistryEvent`/tile/handoff broadcast and the
//! `*_result` reply to its own requests, all ordered per spec's fan-out
//! guarantee. Grounded on the teacher's `attach_proxy::bridge_ws` split
//! of a `tokio_tungstenite` stream into independent reader/writer halves,
//! generalized from client to server role.

use crate::error::DaemonError;
use crate::router::Router;
use corral_core::{Session, SessionId};
use corral_registry::RegistryEvent;
use corral_wire::{ClientMessage, NotificationPayload, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;

/// Capacity of a client's outbound queue before the coalescing policy
/// (spec.md §4.3) starts dropping messages.
pub const OUTBOUND_QUEUE_CAP: usize = 256;

/// One broadcast-worthy effect the hub relays to every connected client,
/// beyond what the registry itself produces (those arrive as
/// [`RegistryEvent`] on a separate channel the orchestrator also feeds
/// into the hub).
#[derive(Debug, Clone)]
pub enum HubBroadcast {
    HandoffReady { session_id: SessionId, path: std::path::PathBuf },
    AutocompactToggled { enabled: bool, warning: Option<String> },
    NotificationFired(NotificationPayload),
}

/// Never dropped under backpressure, per spec.md §4.3.
fn is_undroppable(msg: &ServerMessage) -> bool {
    matches!(
        msg,
        ServerMessage::InitialState { .. }
            | ServerMessage::SessionRemoved { .. }
            | ServerMessage::FocusChanged { .. }
            | ServerMessage::HandoffReady { .. }
            | ServerMessage::FocusTerminalResult { .. }
            | ServerMessage::TileWindowsResult { .. }
            | ServerMessage::MaximizeWindowResult { .. }
            | ServerMessage::PositionBrowserLayoutResult { .. }
            | ServerMessage::SmartTileAddResult { .. }
            | ServerMessage::CreateWorktreeResult { .. }
            | ServerMessage::ListWorktreesResult { .. }
            | ServerMessage::RemoveWorktreeResult { .. }
            | ServerMessage::LaunchSessionResult { .. }
            | ServerMessage::ToggleAutocompactResult { .. }
            | ServerMessage::UpdateNotificationSettingsResult { .. }
    )
}

fn coalesce_key(msg: &ServerMessage) -> Option<SessionId> {
    match msg {
        ServerMessage::SessionUpdate { session } => Some(session.id.clone()),
        _ => None,
    }
}

fn is_telemetry(msg: &ServerMessage) -> bool {
    matches!(msg, ServerMessage::ClaudeOperation { .. } | ServerMessage::ApiLog { .. } | ServerMessage::ServerLog { .. })
}

/// A per-client outbound queue implementing the drop policy of spec.md
/// §4.3 explicitly, since `tokio::sync::mpsc` has no drop-oldest
/// semantics of its own: on overflow, drop the oldest queued
/// `session_update` for the same session_id first, then the oldest
/// telemetry message, and only disconnect the client if the queue is
/// still full of undroppable messages.
struct OutboundQueue {
    cap: usize,
    items: VecDeque<ServerMessage>,
}

impl OutboundQueue {
    fn new(cap: usize) -> Self {
        Self { cap, items: VecDeque::with_capacity(cap) }
    }

    /// Returns `false` when the client must be disconnected (queue stayed
    /// full of undroppable messages after the drop policy ran).
    fn push(&mut self, msg: ServerMessage) -> bool {
        if self.items.len() < self.cap {
            self.items.push_back(msg);
            return true;
        }

        if let Some(key) = coalesce_key(&msg) {
            if let Some(pos) = self.items.iter().position(|m| coalesce_key(m).as_ref() == Some(&key)) {
                self.items.remove(pos);
                self.items.push_back(msg);
                return true;
            }
        }

        if let Some(pos) = self.items.iter().position(is_telemetry) {
            self.items.remove(pos);
            self.items.push_back(msg);
            return true;
        }

        if !is_undroppable(&msg) {
            // No room and nothing droppable to make room for this one;
            // the message itself is the one we drop.
            return true;
        }

        false
    }

    fn drain(&mut self) -> Vec<ServerMessage> {
        self.items.drain(..).collect()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn pop_front(&mut self) -> Option<ServerMessage> {
        self.items.pop_front()
    }
}

struct Client {
    sender: mpsc::UnboundedSender<QueueOp>,
}

enum QueueOp {
    Push(ServerMessage),
}

/// Spawns the hub's TCP accept loop. Each accepted connection gets its
/// own outbound queue and a dedicated writer task; `registry_events` is
/// forwarded into every connected client as `session_update` /
/// `session_removed` / `focus_changed`, and `broadcasts` carries
/// everything else (handoff, autocompact, notifications).
pub async fn bind(addr: &str) -> Result<TcpListener, DaemonError> {
    TcpListener::bind(addr).await.map_err(|source| DaemonError::HubBind { addr: addr.to_string(), source })
}

pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    mut registry_events: mpsc::UnboundedReceiver<RegistryEvent>,
    broadcasts: broadcast::Sender<HubBroadcast>,
) {
    let clients: Arc<parking_lot::Mutex<Vec<Client>>> = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let fanout_clients = clients.clone();
    tokio::spawn(async move {
        while let Some(event) = registry_events.recv().await {
            let msg = match event {
                RegistryEvent::SessionUpdated(session) => ServerMessage::SessionUpdate { session },
                RegistryEvent::SessionRemoved(session_id) => ServerMessage::SessionRemoved { session_id },
                RegistryEvent::FocusChanged { session_id, session } => {
                    ServerMessage::FocusChanged { session_id, session }
                }
            };
            broadcast_to(&fanout_clients, msg);
        }
    });

    let broadcast_clients = clients.clone();
    let mut broadcast_rx = broadcasts.subscribe();
    tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(HubBroadcast::HandoffReady { session_id, path }) => {
                    broadcast_to(&broadcast_clients, ServerMessage::HandoffReady { session_id, path });
                }
                Ok(HubBroadcast::AutocompactToggled { enabled, warning }) => {
                    broadcast_to(&broadcast_clients, ServerMessage::AutocompactToggled { enabled, warning });
                }
                Ok(HubBroadcast::NotificationFired(notification)) => {
                    broadcast_to(&broadcast_clients, ServerMessage::NotificationFired { notification });
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let router = router.clone();
                let clients = clients.clone();
                tokio::spawn(async move {
                    handle_connection(stream, router, clients).await;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "hub accept failed");
            }
        }
    }
}

fn broadcast_to(clients: &parking_lot::Mutex<Vec<Client>>, msg: ServerMessage) {
    let mut guard = clients.lock();
    guard.retain(|client| client.sender.send(QueueOp::Push(msg.clone())).is_ok());
}

async fn handle_connection(stream: TcpStream, router: Arc<Router>, clients: Arc<parking_lot::Mutex<Vec<Client>>>) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "hub websocket handshake failed");
            return;
        }
    };
    let (mut ws_writer, mut ws_reader) = ws_stream.split();

    let (op_tx, mut op_rx) = mpsc::unbounded_channel::<QueueOp>();
    clients.lock().push(Client { sender: op_tx.clone() });

    let initial_sessions: Vec<Session> = router.registry.all().await.unwrap_or_default();
    let focused = router.registry.focused_session_id().await.unwrap_or(None);
    let _ = op_tx.send(QueueOp::Push(ServerMessage::InitialState {
        sessions: initial_sessions,
        focused_session_id: focused,
    }));

    // `send_tx` is bounded to a single slot: the writer only has capacity
    // for the one message it's currently awaiting the socket write for.
    // That makes `reserve()` below resolve only once the writer is ready
    // for the next message, so a slow client actually backs up in
    // `OutboundQueue` instead of buffering unboundedly past it — which is
    // what lets the queue's coalesce/drop policy ever engage.
    let (send_tx, mut send_rx) = mpsc::channel::<ServerMessage>(1);
    let writer_task = tokio::spawn(async move {
        while let Some(msg) = send_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else { continue };
            if ws_writer.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let queue_task = tokio::spawn(async move {
        let mut queue = OutboundQueue::new(OUTBOUND_QUEUE_CAP);
        loop {
            tokio::select! {
                biased;

                permit = send_tx.reserve(), if !queue.is_empty() => {
                    let Ok(permit) = permit else { break };
                    if let Some(next) = queue.pop_front() {
                        permit.send(next);
                    }
                }
                op = op_rx.recv() => {
                    match op {
                        Some(QueueOp::Push(msg)) => {
                            if !queue.push(msg) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    });

    while let Some(frame) = ws_reader.next().await {
        match frame {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(request) => {
                    let reply = router.dispatch(request).await;
                    if let Some(reply) = reply {
                        let _ = op_tx.send(QueueOp::Push(reply));
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "hub: unparseable client request");
                }
            },
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    queue_task.abort();
    writer_task.abort();
    clients.lock().retain(|c| !c.sender.same_channel(&op_tx));
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
