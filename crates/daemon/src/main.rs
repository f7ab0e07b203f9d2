// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corrald`: the daemon binary. Wires together the event ingress (C1),
//! the session registry (C2), the subscription hub (C3), the focus
//! watcher (C4), the tile-state model (C5), and the handoff watcher (C8)
//! behind one `tokio` runtime, then hands requests to the router (C9).
//!
//! Startup order matters: both listeners are bound before any actor is
//! spawned, so a bind failure unwinds cleanly without leaving orphaned
//! tasks behind — per spec.md §5's fatal-startup-error rule.

mod error;
mod hub;
mod ingress;
mod router;

use clap::Parser;
use corral_adapters::launcher::NoopSessionLauncher;
use corral_adapters::window::WindowAdapter;
use corral_adapters::worktree::GitWorktreeAdapter;
use corral_config::{AutocompactStore, DaemonConfig, NotificationStore};
use corral_core::SystemClock;
use error::DaemonError;
use router::Router;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Debug, Parser)]
#[command(name = "corrald", about = "Local coordinator daemon for AI-coding terminal sessions")]
struct Args {
    /// Path to config.toml. Defaults to $XDG_CONFIG_HOME/corral/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON-formatted log lines instead of the default human format.
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(log_dir: &std::path::Path, json: bool) -> tracing_appender::non_blocking::WorkerGuard {
    let _ = std::fs::create_dir_all(log_dir);
    let file_appender = tracing_appender::rolling::daily(log_dir, "corrald.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(non_blocking);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    guard
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();

    let config = match DaemonConfig::load(args.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let log_dir = config.ingress_socket_path.parent().map(|p| p.join("logs")).unwrap_or_else(|| PathBuf::from("."));
    let _tracing_guard = init_tracing(&log_dir, args.log_json);

    match run(config).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "corrald failed to start");
            std::process::ExitCode::FAILURE
        }
    }
}

// `tiles::spawn`/`focus::spawn` are generic over a concrete (`Sized`)
// `WindowAdapter` so the actor can hold `Arc<W>` directly; `run` stays
// generic over the same `W` for that reason; only `Router`, which calls
// through a trait object, needs the `Arc<dyn WindowAdapter>` erasure.
#[cfg(target_os = "macos")]
async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    run_with_adapter(config, corral_adapters::window::MacosWindowAdapter::default()).await
}

#[cfg(target_os = "windows")]
async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    run_with_adapter(config, corral_adapters::window::WindowsWindowAdapter::default()).await
}

#[cfg(target_os = "linux")]
async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    run_with_adapter(config, corral_adapters::window::LinuxWindowAdapter::default()).await
}

#[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
async fn run(config: DaemonConfig) -> Result<(), DaemonError> {
    run_with_adapter(config, corral_adapters::window::NoopWindowAdapter).await
}

async fn run_with_adapter<W>(config: DaemonConfig, window_adapter: W) -> Result<(), DaemonError>
where
    W: WindowAdapter + 'static,
{
    // Bind both listeners before spawning anything, so a failure here
    // never leaves an actor or watcher task orphaned.
    let ingress_listener = ingress::bind(&config.ingress_socket_path).await?;
    let hub_addr = format!("{}:{}", config.ws_bind_addr, config.ws_port);
    let hub_listener = hub::bind(&hub_addr).await?;

    let window_adapter = Arc::new(window_adapter);

    let process_checker = Arc::new(corral_registry::SystemProcessChecker);
    let transcript_checker = Arc::new(corral_registry::SystemTranscriptChecker);
    let (registry, mut registry_events) = corral_registry::registry::spawn(
        SystemClock,
        config.stale_reap_threshold,
        config.stale_reap_interval,
        config.process_verify_interval,
        process_checker,
        transcript_checker,
    );

    let autocompact_store = AutocompactStore::new(config.autocompact_settings_path.clone());
    if let Ok(settings) = autocompact_store.read() {
        let _ = registry.set_autocompact(settings.enabled).await;
    }
    let notification_store = NotificationStore::new(config.notification_settings_path.clone());
    let notify_adapter: Arc<dyn corral_adapters::notify::NotifyAdapter> =
        Arc::new(corral_adapters::notify::DesktopNotifyAdapter::new());

    let (broadcasts, _broadcast_rx) = broadcast::channel::<hub::HubBroadcast>(256);

    // `TileStateHandle::spawn`'s `live_sessions` closure must be cheap and
    // synchronous; a task taps the registry's event stream to keep a
    // liveness snapshot, fire desktop notifications on the documented
    // status transitions, and re-forward every event on to the hub.
    let live_sessions: Arc<parking_lot::Mutex<HashSet<corral_core::SessionId>>> =
        Arc::new(parking_lot::Mutex::new(HashSet::new()));
    let (hub_events_tx, hub_events_rx) = tokio::sync::mpsc::unbounded_channel();
    let live_for_task = live_sessions.clone();
    let notification_store_for_task = notification_store.clone();
    let notify_adapter_for_task = notify_adapter.clone();
    let broadcasts_for_notify = broadcasts.clone();
    tokio::spawn(async move {
        let mut last_status: std::collections::HashMap<corral_core::SessionId, (corral_core::SessionStatus, String)> =
            std::collections::HashMap::new();
        while let Some(event) = registry_events.recv().await {
            match &event {
                corral_registry::RegistryEvent::SessionUpdated(s) => {
                    live_for_task.lock().insert(s.id.clone());
                    let session_name = s.title.clone().unwrap_or_else(|| s.wire_id.clone());
                    let was_awaiting =
                        last_status.get(&s.id).map(|(status, _)| *status == corral_core::SessionStatus::Awaiting);
                    if s.status == corral_core::SessionStatus::Awaiting && was_awaiting != Some(true) {
                        notify(
                            &notification_store_for_task,
                            &notify_adapter_for_task,
                            &broadcasts_for_notify,
                            "awaiting_approval",
                            |settings| settings.awaiting_approval,
                            "Awaiting approval".to_string(),
                            format!("{session_name} is waiting on a tool approval"),
                            Some(s.id.clone()),
                        )
                        .await;
                    }
                    last_status.insert(s.id.clone(), (s.status, session_name));
                }
                corral_registry::RegistryEvent::SessionRemoved(id) => {
                    live_for_task.lock().remove(id);
                    let session_name =
                        last_status.remove(id).map(|(_, name)| name).unwrap_or_else(|| id.to_string());
                    notify(
                        &notification_store_for_task,
                        &notify_adapter_for_task,
                        &broadcasts_for_notify,
                        "session_ended",
                        |settings| settings.session_ended,
                        "Session ended".to_string(),
                        format!("{session_name} has ended"),
                        Some(id.clone()),
                    )
                    .await;
                }
                corral_registry::RegistryEvent::FocusChanged { .. } => {}
            }
            if hub_events_tx.send(event).is_err() {
                break;
            }
        }
    });

    let live_for_tiles = live_sessions.clone();
    let tiles = corral_registry::tiles::spawn(SystemClock, window_adapter.clone(), move |id| {
        live_for_tiles.lock().contains(id)
    });

    let focus_handle = corral_registry::focus::spawn(window_adapter.clone(), registry.clone(), config.focus_poll_interval);

    let (handoff_watcher, mut handoff_rx) = corral_adapters::handoff::HandoffWatcher::new();
    let handoff_watcher = Arc::new(handoff_watcher);
    let handoff_relative_path = config.handoff_relative_path.clone();
    let handoff_registry = registry.clone();
    let handoff_watcher_for_watch = handoff_watcher.clone();
    let watch_task = tokio::spawn(async move {
        spawn_watches_as_sessions_register(handoff_watcher_for_watch, handoff_registry, handoff_relative_path).await;
    });

    let broadcasts_for_handoff = broadcasts.clone();
    let broadcasts_for_hub = broadcasts.clone();
    let notification_store_for_handoff = notification_store.clone();
    let notify_adapter_for_handoff = notify_adapter.clone();
    let handoff_relay = tokio::spawn(async move {
        while let Some(ready) = handoff_rx.recv().await {
            let _ = broadcasts_for_handoff
                .send(hub::HubBroadcast::HandoffReady { session_id: ready.session_id.clone(), path: ready.path.clone() });
            notify(
                &notification_store_for_handoff,
                &notify_adapter_for_handoff,
                &broadcasts_for_handoff,
                "handoff_ready",
                |settings| settings.handoff_ready,
                "Handoff ready".to_string(),
                format!("{} is ready for handoff", ready.path.display()),
                Some(ready.session_id),
            )
            .await;
        }
    });

    let window_adapter_dyn: Arc<dyn WindowAdapter> = window_adapter;
    let router = Arc::new(Router {
        registry: registry.clone(),
        tiles,
        window_adapter: window_adapter_dyn,
        worktree_adapter: Arc::new(GitWorktreeAdapter::new()),
        launcher: Arc::new(NoopSessionLauncher),
        autocompact_store,
        notification_store,
        broadcasts,
    });

    tokio::spawn(ingress::serve(ingress_listener, registry));
    let hub_task = tokio::spawn(hub::serve(hub_listener, router, hub_events_rx, broadcasts_for_hub));

    tracing::info!(
        ingress = %config.ingress_socket_path.display(),
        hub = %hub_addr,
        "corrald started"
    );

    shutdown_signal().await;
    tracing::info!("shutdown signal received, draining in-flight work");

    focus_handle.abort();
    watch_task.abort();
    handoff_relay.abort();
    hub_task.abort();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    Ok(())
}

/// Starts (and stops) per-session handoff watches as sessions with a
/// known project root register and unregister, so §4.8's "start/stop on
/// demand" requirement doesn't need every caller to remember to do it.
async fn spawn_watches_as_sessions_register(
    watcher: Arc<corral_adapters::handoff::HandoffWatcher>,
    registry: corral_registry::RegistryHandle,
    relative_path: PathBuf,
) {
    let mut seen: std::collections::HashMap<corral_core::SessionId, PathBuf> = std::collections::HashMap::new();
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(2));
    loop {
        ticker.tick().await;
        let Ok(sessions) = registry.all().await else { continue };
        let live: HashSet<_> = sessions.iter().map(|s| s.id.clone()).collect();

        for session in &sessions {
            if seen.contains_key(&session.id) {
                continue;
            }
            let Some(root) = session.git_repo_root.as_deref().or(session.cwd.as_deref()) else { continue };
            let root = PathBuf::from(root);
            if watcher.watch(session.id.clone(), &root, &relative_path).is_ok() {
                seen.insert(session.id.clone(), root);
            }
        }

        seen.retain(|id, root| {
            if live.contains(id) {
                return true;
            }
            watcher.unwatch(root, &relative_path);
            false
        });
    }
}

/// Fires a desktop notification and its `notification_fired` broadcast iff
/// `gate` says the persisted category is enabled. A read failure is
/// treated as disabled rather than defaulting to on, so a corrupt
/// settings file fails closed.
#[allow(clippy::too_many_arguments)]
async fn notify(
    notification_store: &NotificationStore,
    notify_adapter: &Arc<dyn corral_adapters::notify::NotifyAdapter>,
    broadcasts: &broadcast::Sender<hub::HubBroadcast>,
    category: &'static str,
    gate: impl FnOnce(&corral_core::NotificationSettings) -> bool,
    title: String,
    message: String,
    session_id: Option<corral_core::SessionId>,
) {
    let enabled = notification_store.read().map(|s| gate(&s)).unwrap_or(false);
    if !enabled {
        return;
    }
    if let Err(e) = notify_adapter.notify(&title, &message).await {
        tracing::warn!(error = %e, category, "failed to send desktop notification");
    }
    let _ = broadcasts.send(hub::HubBroadcast::NotificationFired(corral_wire::NotificationPayload {
        category: category.to_string(),
        title,
        message,
        session_id,
    }));
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = &mut ctrl_c => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
