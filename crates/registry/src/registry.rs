// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The session registry actor (C2): the single authority for live session
//! state. Owns a `HashMap<SessionId, Session>` behind an mpsc mailbox so
//! every mutation is serialized without a lock, the same shape as the
//! teacher's runtime dispatch loop but message-driven rather than
//! method-driven, since this component's mutations arrive from several
//! independent sources (ingress, focus watcher, reaping timers, the
//! request router) that must never interleave mid-mutation.

use crate::error::RegistryError;
use crate::reap::{ProcessChecker, TranscriptChecker};
use corral_core::{Clock, ContextMetrics, Event, Session, SessionId, SessionStatus, TerminalKey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Default interval between stale-cleanup sweeps.
pub const DEFAULT_STALE_REAP_INTERVAL: Duration = Duration::from_secs(5 * 60);
/// Default "no activity" threshold a session must cross before it's
/// eligible for stale cleanup.
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_secs(5 * 60);
/// Default interval between process-liveness sweeps.
pub const DEFAULT_PROCESS_VERIFY_INTERVAL: Duration = Duration::from_secs(30);

/// Broadcast-worthy effects of a registry mutation, consumed by the
/// daemon orchestrator and relayed to the subscription hub. Kept as a
/// separate output channel from the mailbox's per-call oneshot replies so
/// the hub doesn't have to synchronously await every registry call.
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    SessionUpdated(Session),
    SessionRemoved(SessionId),
    FocusChanged { session_id: Option<SessionId>, session: Option<Session> },
}

enum RegistryMessage {
    Ingest { event: Event, respond: oneshot::Sender<Result<Option<Session>, RegistryError>> },
    Get { session_id: SessionId, respond: oneshot::Sender<Option<Session>> },
    All { respond: oneshot::Sender<Vec<Session>> },
    FocusedSessionId { respond: oneshot::Sender<Option<SessionId>> },
    SetFocus { session_id: Option<SessionId>, respond: oneshot::Sender<bool> },
    Remove { session_id: SessionId, respond: oneshot::Sender<bool> },
    ReapStale { respond: Option<oneshot::Sender<()>> },
    ReapDead { respond: Option<oneshot::Sender<()>> },
    SetAutocompact { enabled: bool, respond: oneshot::Sender<()> },
}

/// Cheaply-cloneable handle to a running registry actor.
#[derive(Clone)]
pub struct RegistryHandle {
    sender: mpsc::UnboundedSender<RegistryMessage>,
}

impl RegistryHandle {
    async fn call<T>(
        &self,
        make_msg: impl FnOnce(oneshot::Sender<T>) -> RegistryMessage,
    ) -> Result<T, RegistryError> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(make_msg(tx)).map_err(|_| RegistryError::Closed)?;
        rx.await.map_err(|_| RegistryError::Closed)
    }

    /// Applies one event to the registry, returning the mutated session
    /// or `None` if the event was ignored (unknown session id for a
    /// non-`session_start` event).
    pub async fn ingest(&self, event: Event) -> Result<Option<Session>, RegistryError> {
        self.call(|respond| RegistryMessage::Ingest { event, respond }).await?
    }

    pub async fn get(&self, session_id: SessionId) -> Result<Option<Session>, RegistryError> {
        self.call(|respond| RegistryMessage::Get { session_id, respond }).await
    }

    pub async fn all(&self) -> Result<Vec<Session>, RegistryError> {
        self.call(RegistryMessage::All).await
    }

    pub async fn focused_session_id(&self) -> Result<Option<SessionId>, RegistryError> {
        self.call(RegistryMessage::FocusedSessionId).await
    }

    /// Returns `true` iff focus actually changed.
    pub async fn set_focus(&self, session_id: Option<SessionId>) -> Result<bool, RegistryError> {
        self.call(|respond| RegistryMessage::SetFocus { session_id, respond }).await
    }

    /// Returns `true` iff the session existed and was removed.
    pub async fn remove(&self, session_id: SessionId) -> Result<bool, RegistryError> {
        self.call(|respond| RegistryMessage::Remove { session_id, respond }).await
    }

    /// Runs a stale-cleanup sweep immediately and waits for it to finish.
    /// Used by the timer loop (fire-and-forget) and by tests that need a
    /// deterministic point to inspect the result.
    pub async fn reap_stale(&self) -> Result<(), RegistryError> {
        self.call(|respond| RegistryMessage::ReapStale { respond: Some(respond) }).await
    }

    /// Runs a process-liveness sweep immediately and waits for it to finish.
    pub async fn reap_dead(&self) -> Result<(), RegistryError> {
        self.call(|respond| RegistryMessage::ReapDead { respond: Some(respond) }).await
    }

    /// Applies the given autocompact setting to every live session (so a
    /// toggle is reflected immediately, not just for sessions registered
    /// afterward) and records it as the default for sessions that start
    /// from here on. Emits a `SessionUpdated` event per changed session.
    pub async fn set_autocompact(&self, enabled: bool) -> Result<(), RegistryError> {
        self.call(|respond| RegistryMessage::SetAutocompact { enabled, respond }).await
    }
}

struct Actor<C: Clock> {
    clock: C,
    sessions: HashMap<SessionId, Session>,
    wire_ids: HashMap<String, SessionId>,
    focused: Option<SessionId>,
    stale_threshold: Duration,
    process_checker: Arc<dyn ProcessChecker>,
    transcript_checker: Arc<dyn TranscriptChecker>,
    events: mpsc::UnboundedSender<RegistryEvent>,
    autocompact_enabled: bool,
}

impl<C: Clock> Actor<C> {
    fn handle_ingest(&mut self, event: Event) -> Option<Session> {
        let wire_id = event.session_id().to_string();
        let now = self.clock.epoch_ms();

        match &event {
            Event::SessionStart {
                title,
                transcript_path,
                cwd,
                project,
                git_repo_root,
                git_branch,
                git_worktree,
                terminal_key,
                ..
            } => {
                if let Some(session_id) = self.wire_ids.get(&wire_id).cloned() {
                    // Re-registration: preserve status, refresh reported fields.
                    let session = self.sessions.get_mut(&session_id)?;
                    if let Some(v) = title {
                        session.title = Some(v.clone());
                    }
                    if let Some(v) = transcript_path {
                        session.transcript_path = Some(v.clone());
                    }
                    if let Some(v) = cwd {
                        session.cwd = Some(v.clone());
                    }
                    if let Some(v) = project {
                        session.project_name = Some(v.clone());
                    }
                    if let Some(v) = git_repo_root {
                        session.git_repo_root = Some(v.clone());
                    }
                    if let Some(v) = git_branch {
                        session.git_branch = Some(v.clone());
                    }
                    if let Some(v) = git_worktree {
                        session.git_worktree = Some(v.clone());
                    }
                    if let Some(v) = terminal_key {
                        session.terminal_key = TerminalKey::new(v.clone());
                    }
                    session.last_activity_epoch_ms = now;
                    Some(session.clone())
                } else {
                    let session_id = SessionId::new();
                    let session = Session {
                        id: session_id.clone(),
                        wire_id: wire_id.clone(),
                        title: title.clone(),
                        transcript_path: transcript_path.clone(),
                        cwd: cwd.clone(),
                        project_name: project.clone(),
                        git_repo_root: git_repo_root.clone(),
                        git_branch: git_branch.clone(),
                        git_worktree: git_worktree.clone(),
                        terminal_key: terminal_key.clone().map(TerminalKey::new).unwrap_or_default(),
                        status: SessionStatus::Active,
                        last_tool_name: None,
                        context_metrics: None,
                        registered_at_epoch_ms: now,
                        last_activity_epoch_ms: now,
                        autocompact: self.autocompact_enabled,
                        active_tool_calls: 0,
                    };
                    self.wire_ids.insert(wire_id, session_id.clone());
                    self.sessions.insert(session_id.clone(), session.clone());
                    Some(session)
                }
            }
            Event::SessionUpdate { title, transcript_path, cwd, project, git_repo_root, git_branch, git_worktree, .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                if let Some(v) = title {
                    session.title = Some(v.clone());
                }
                if let Some(v) = transcript_path {
                    session.transcript_path = Some(v.clone());
                }
                if let Some(v) = cwd {
                    session.cwd = Some(v.clone());
                }
                if let Some(v) = project {
                    session.project_name = Some(v.clone());
                }
                if let Some(v) = git_repo_root {
                    session.git_repo_root = Some(v.clone());
                }
                if let Some(v) = git_branch {
                    session.git_branch = Some(v.clone());
                }
                if let Some(v) = git_worktree {
                    session.git_worktree = Some(v.clone());
                }
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
            Event::ToolUseStart { tool_name, .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                session.status = SessionStatus::Working;
                session.last_tool_name = Some(tool_name.clone());
                session.active_tool_calls += 1;
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
            Event::ToolUseAwaitingApproval { tool_name, .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                session.status = SessionStatus::Awaiting;
                session.last_tool_name = Some(tool_name.clone());
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
            Event::ToolUseEnd { tool_name, .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                session.active_tool_calls = session.active_tool_calls.saturating_sub(1);
                session.status =
                    if session.active_tool_calls > 0 { SessionStatus::Working } else { SessionStatus::Idle };
                if let Some(name) = tool_name {
                    session.last_tool_name = Some(name.clone());
                }
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
            Event::AssistantResponseComplete { context_metrics, .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                session.status = SessionStatus::Idle;
                session.active_tool_calls = 0;
                if let Some(metrics) = context_metrics {
                    session.context_metrics = Some(*metrics);
                }
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
            Event::SessionEnd { .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                self.remove_internal(session_id);
                None
            }
            Event::ClaudeOperation { .. } => {
                let session_id = self.wire_ids.get(&wire_id).cloned()?;
                let session = self.sessions.get_mut(&session_id)?;
                session.last_activity_epoch_ms = now;
                Some(session.clone())
            }
        }
    }

    fn set_autocompact(&mut self, enabled: bool) {
        self.autocompact_enabled = enabled;
        let changed: Vec<Session> = self
            .sessions
            .values_mut()
            .filter(|s| s.autocompact != enabled)
            .map(|s| {
                s.autocompact = enabled;
                s.clone()
            })
            .collect();
        for session in changed {
            let _ = self.events.send(RegistryEvent::SessionUpdated(session));
        }
    }

    fn remove_internal(&mut self, session_id: SessionId) -> bool {
        let Some(session) = self.sessions.remove(&session_id) else { return false };
        self.wire_ids.remove(&session.wire_id);
        if self.focused == Some(session_id.clone()) {
            self.focused = None;
            let _ = self.events.send(RegistryEvent::FocusChanged { session_id: None, session: None });
        }
        let _ = self.events.send(RegistryEvent::SessionRemoved(session_id));
        true
    }

    fn reap_stale(&mut self) {
        let now = self.clock.epoch_ms();
        let threshold_ms = self.stale_threshold.as_millis() as u64;
        let stale: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|s| {
                if now.saturating_sub(s.last_activity_epoch_ms) <= threshold_ms {
                    return false;
                }
                match &s.transcript_path {
                    Some(path) => match self.transcript_checker.mtime_epoch_ms(path) {
                        Some(mtime) => now.saturating_sub(mtime) > threshold_ms,
                        None => true,
                    },
                    None => true,
                }
            })
            .map(|s| s.id.clone())
            .collect();

        for session_id in stale {
            tracing::info!(%session_id, "reaping stale session");
            self.remove_internal(session_id);
        }
    }

    fn reap_dead(&mut self) {
        let dead: Vec<SessionId> = self
            .sessions
            .values()
            .filter_map(|s| {
                let pid = s.terminal_key.pid()?;
                (!self.process_checker.is_alive(pid)).then(|| s.id.clone())
            })
            .collect();

        for session_id in dead {
            tracing::info!(%session_id, "reaping session with a dead hosting process");
            self.remove_internal(session_id);
        }
    }
}

/// Spawns the registry actor along with its stale-cleanup and
/// process-verification timers, which post `ReapStale`/`ReapDead`
/// messages into the same mailbox so reaping never races a concurrent
/// `ingest`.
pub fn spawn<C: Clock + 'static>(
    clock: C,
    stale_threshold: Duration,
    stale_reap_interval: Duration,
    process_verify_interval: Duration,
    process_checker: Arc<dyn ProcessChecker>,
    transcript_checker: Arc<dyn TranscriptChecker>,
) -> (RegistryHandle, mpsc::UnboundedReceiver<RegistryEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<RegistryMessage>();
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let mut actor = Actor {
        clock,
        sessions: HashMap::new(),
        wire_ids: HashMap::new(),
        focused: None,
        stale_threshold,
        process_checker,
        transcript_checker,
        events: events_tx,
        autocompact_enabled: false,
    };

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                RegistryMessage::Ingest { event, respond } => {
                    let before = actor
                        .wire_ids
                        .get(event.session_id())
                        .and_then(|id| actor.sessions.get(id))
                        .cloned();
                    let result = actor.handle_ingest(event);
                    if let Some(session) = &result {
                        if before.as_ref() != Some(session) {
                            let _ = actor.events.send(RegistryEvent::SessionUpdated(session.clone()));
                        }
                    }
                    let _ = respond.send(Ok(result));
                }
                RegistryMessage::Get { session_id, respond } => {
                    let _ = respond.send(actor.sessions.get(&session_id).cloned());
                }
                RegistryMessage::All { respond } => {
                    let _ = respond.send(actor.sessions.values().cloned().collect());
                }
                RegistryMessage::FocusedSessionId { respond } => {
                    let _ = respond.send(actor.focused.clone());
                }
                RegistryMessage::SetFocus { session_id, respond } => {
                    let changed = actor.focused != session_id;
                    if changed {
                        actor.focused = session_id.clone();
                        let session = session_id.as_ref().and_then(|id| actor.sessions.get(id).cloned());
                        let _ = actor
                            .events
                            .send(RegistryEvent::FocusChanged { session_id: session_id.clone(), session });
                    }
                    let _ = respond.send(changed);
                }
                RegistryMessage::Remove { session_id, respond } => {
                    let removed = actor.remove_internal(session_id);
                    let _ = respond.send(removed);
                }
                RegistryMessage::ReapStale { respond } => {
                    actor.reap_stale();
                    if let Some(respond) = respond {
                        let _ = respond.send(());
                    }
                }
                RegistryMessage::ReapDead { respond } => {
                    actor.reap_dead();
                    if let Some(respond) = respond {
                        let _ = respond.send(());
                    }
                }
                RegistryMessage::SetAutocompact { enabled, respond } => {
                    actor.set_autocompact(enabled);
                    let _ = respond.send(());
                }
            }
        }
    });

    let stale_tx = tx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(stale_reap_interval);
        loop {
            ticker.tick().await;
            if stale_tx.send(RegistryMessage::ReapStale { respond: None }).is_err() {
                break;
            }
        }
    });

    let dead_tx = tx.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(process_verify_interval);
        loop {
            ticker.tick().await;
            if dead_tx.send(RegistryMessage::ReapDead { respond: None }).is_err() {
                break;
            }
        }
    });

    (RegistryHandle { sender: tx }, events_rx)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
