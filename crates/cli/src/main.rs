// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `corralctl`: a thin diagnostic client for the subscription hub (C3).
//! Every subcommand either streams the hub's broadcast feed (`watch`) or
//! sends one [`ClientMessage`] and prints the matching `*_result` reply,
//! the same request/response shape the real UI speaks over the same
//! port. Grounded on the teacher's `cli::client::DaemonClient` query
//! pattern, adapted from a length-prefixed local socket to a loopback
//! WebSocket.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use corral_core::{DisplayId, SessionId};
use corral_wire::{BrowserLayout, ClientMessage, ServerMessage, TileLayout};
use futures_util::{SinkExt, StreamExt};
use std::path::PathBuf;
use tokio_tungstenite::tungstenite::Message;

/// Default address of a locally running `corrald`'s subscription hub.
const DEFAULT_ADDR: &str = "127.0.0.1:4242";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "corralctl", about = "Diagnostic client for the corral daemon's subscription hub")]
struct Cli {
    /// host:port of the daemon's WebSocket hub. Defaults to 127.0.0.1:4242.
    #[arg(long, global = true, default_value = DEFAULT_ADDR)]
    addr: String,

    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print `initial_state` then stream every subsequent broadcast.
    Watch,
    /// Activate a session's terminal window.
    FocusTerminal { session_id: String },
    /// Arrange sessions into a grid on one display.
    TileWindows {
        session_ids: Vec<String>,
        #[arg(long)]
        display_id: Option<u32>,
    },
    /// Maximize a session's window on its current (or given) display.
    MaximizeWindow {
        session_id: String,
        #[arg(long)]
        display_id: Option<u32>,
    },
    /// Position a browser alongside one or two terminals.
    PositionBrowserLayout {
        session_ids: Vec<String>,
        #[arg(long, value_enum)]
        layout: BrowserLayoutArg,
    },
    /// Add one more tile to the current arrangement, repositioning as needed.
    SmartTileAdd {
        #[arg(long)]
        launch_cwd: Option<PathBuf>,
        #[arg(long)]
        new_session_id: Option<String>,
        #[arg(long)]
        display_id: Option<u32>,
        #[arg(long)]
        dangerously_skip_permissions: bool,
    },
    /// Create a git worktree under a repo root.
    CreateWorktree {
        repo_root: PathBuf,
        name: String,
        #[arg(long)]
        base_branch: Option<String>,
        #[arg(long)]
        launch_session: bool,
        #[arg(long)]
        dangerously_skip_permissions: bool,
    },
    /// List the worktrees of a repo root.
    ListWorktrees { repo_root: PathBuf },
    /// Remove a worktree by name.
    RemoveWorktree { repo_root: PathBuf, name: String },
    /// Launch a new terminal session in a directory.
    LaunchSession {
        cwd: PathBuf,
        #[arg(long)]
        preferred_terminal: Option<String>,
        #[arg(long)]
        dangerously_skip_permissions: bool,
    },
    /// Toggle the daemon-wide autocompact setting.
    ToggleAutocompact { enabled: bool },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BrowserLayoutArg {
    BrowserTerminal,
    BrowserTwoTerminals,
}

impl From<BrowserLayoutArg> for BrowserLayout {
    fn from(value: BrowserLayoutArg) -> Self {
        match value {
            BrowserLayoutArg::BrowserTerminal => BrowserLayout::BrowserTerminal,
            BrowserLayoutArg::BrowserTwoTerminals => BrowserLayout::BrowserTwoTerminals,
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("corralctl: {e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let url = format!("ws://{}", cli.addr);
    let (stream, _response) = tokio_tungstenite::connect_async(&url)
        .await
        .with_context(|| format!("connecting to corrald hub at {}", cli.addr))?;
    let (mut writer, mut reader) = stream.split();

    // Every connection's first message is `initial_state`; `watch` prints
    // it and keeps going, everything else consumes and discards it before
    // sending its one request.
    let initial = next_message(&mut reader).await?;

    if matches!(cli.command, Command::Watch) {
        print_message(cli.format, &initial);
        loop {
            let msg = next_message(&mut reader).await?;
            print_message(cli.format, &msg);
        }
    }

    let request = build_request(&cli.command)?;
    let text = serde_json::to_string(&request).context("encoding request")?;
    writer.send(Message::Text(text.into())).await.context("sending request")?;

    // `select_session` is fire-and-forget (no `*_result`); everything else
    // waits for its matching reply, skipping unrelated broadcasts that
    // arrive first (another client's session_update, telemetry, etc).
    loop {
        let msg = next_message(&mut reader).await?;
        if is_result_for(&request, &msg) {
            print_message(cli.format, &msg);
            return Ok(());
        }
    }
}

async fn next_message(
    reader: &mut (impl StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin),
) -> Result<ServerMessage> {
    loop {
        let frame = reader.next().await.ok_or_else(|| anyhow!("hub closed the connection"))??;
        match frame {
            Message::Text(text) => {
                return serde_json::from_str(&text).context("decoding server message");
            }
            Message::Close(_) => return Err(anyhow!("hub closed the connection")),
            _ => continue,
        }
    }
}

fn is_result_for(request: &ClientMessage, msg: &ServerMessage) -> bool {
    matches!(
        (request, msg),
        (ClientMessage::FocusTerminal { .. }, ServerMessage::FocusTerminalResult { .. })
            | (ClientMessage::TileWindows { .. }, ServerMessage::TileWindowsResult { .. })
            | (ClientMessage::MaximizeWindow { .. }, ServerMessage::MaximizeWindowResult { .. })
            | (ClientMessage::PositionBrowserLayout { .. }, ServerMessage::PositionBrowserLayoutResult { .. })
            | (ClientMessage::SmartTileAdd { .. }, ServerMessage::SmartTileAddResult { .. })
            | (ClientMessage::CreateWorktree { .. }, ServerMessage::CreateWorktreeResult { .. })
            | (ClientMessage::ListWorktrees { .. }, ServerMessage::ListWorktreesResult { .. })
            | (ClientMessage::RemoveWorktree { .. }, ServerMessage::RemoveWorktreeResult { .. })
            | (ClientMessage::LaunchSession { .. }, ServerMessage::LaunchSessionResult { .. })
            | (ClientMessage::ToggleAutocompact { .. }, ServerMessage::ToggleAutocompactResult { .. })
            | (ClientMessage::UpdateNotificationSettings { .. }, ServerMessage::UpdateNotificationSettingsResult { .. })
    )
}

fn build_request(command: &Command) -> Result<ClientMessage> {
    Ok(match command {
        Command::Watch => unreachable!("handled before build_request"),
        Command::FocusTerminal { session_id } => {
            ClientMessage::FocusTerminal { session_id: SessionId::from_string(session_id) }
        }
        Command::TileWindows { session_ids, display_id } => ClientMessage::TileWindows {
            session_ids: session_ids.iter().map(SessionId::from_string).collect(),
            layout: Some(TileLayout::Grid),
            display_id: display_id.map(DisplayId),
        },
        Command::MaximizeWindow { session_id, display_id } => ClientMessage::MaximizeWindow {
            session_id: SessionId::from_string(session_id),
            display_id: display_id.map(DisplayId),
        },
        Command::PositionBrowserLayout { session_ids, layout } => ClientMessage::PositionBrowserLayout {
            session_ids: session_ids.iter().map(SessionId::from_string).collect(),
            layout: (*layout).into(),
        },
        Command::SmartTileAdd { launch_cwd, new_session_id, display_id, dangerously_skip_permissions } => {
            ClientMessage::SmartTileAdd {
                launch_cwd: launch_cwd.clone(),
                new_session_id: new_session_id.as_ref().map(SessionId::from_string),
                display_id: display_id.map(DisplayId),
                dangerously_skip_permissions: Some(*dangerously_skip_permissions),
            }
        }
        Command::CreateWorktree { repo_root, name, base_branch, launch_session, dangerously_skip_permissions } => {
            ClientMessage::CreateWorktree {
                repo_root: repo_root.clone(),
                name: name.clone(),
                base_branch: base_branch.clone(),
                launch_session: Some(*launch_session),
                dangerously_skip_permissions: Some(*dangerously_skip_permissions),
            }
        }
        Command::ListWorktrees { repo_root } => ClientMessage::ListWorktrees { repo_root: repo_root.clone() },
        Command::RemoveWorktree { repo_root, name } => {
            ClientMessage::RemoveWorktree { repo_root: repo_root.clone(), name: name.clone() }
        }
        Command::LaunchSession { cwd, preferred_terminal, dangerously_skip_permissions } => {
            ClientMessage::LaunchSession {
                cwd: cwd.clone(),
                preferred_terminal: preferred_terminal.clone(),
                dangerously_skip_permissions: Some(*dangerously_skip_permissions),
            }
        }
        Command::ToggleAutocompact { enabled } => ClientMessage::ToggleAutocompact { enabled: *enabled },
    })
}

fn print_message(format: OutputFormat, msg: &ServerMessage) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string(msg) {
                println!("{json}");
            }
        }
        OutputFormat::Text => println!("{}", summarize(msg)),
    }
}

/// One-line human summary; `--format json` is the route to the full payload.
fn summarize(msg: &ServerMessage) -> String {
    match msg {
        ServerMessage::InitialState { sessions, focused_session_id } => {
            format!("initial_state: {} session(s), focused={:?}", sessions.len(), focused_session_id)
        }
        ServerMessage::SessionUpdate { session } => format!("session_update: {}", session.id),
        ServerMessage::SessionRemoved { session_id } => format!("session_removed: {session_id}"),
        ServerMessage::FocusChanged { session_id, .. } => format!("focus_changed: {session_id:?}"),
        ServerMessage::AutocompactToggled { enabled, .. } => format!("autocompact_toggled: {enabled}"),
        ServerMessage::HandoffReady { session_id, path } => {
            format!("handoff_ready: {session_id} -> {}", path.display())
        }
        ServerMessage::ClaudeOperation { session_id, .. } => format!("claude_operation: {session_id}"),
        ServerMessage::ApiLog { .. } => "api_log".to_string(),
        ServerMessage::ServerLog { .. } => "server_log".to_string(),
        ServerMessage::NotificationFired { notification } => {
            format!("notification_fired: {} — {}", notification.title, notification.message)
        }
        ServerMessage::FocusTerminalResult { session_id, method, success, error } => {
            format!("focus_terminal_result: {session_id} via {method} success={success} error={error:?}")
        }
        ServerMessage::TileWindowsResult { outcomes } => {
            format!("tile_windows_result: {}/{} succeeded", outcomes.iter().filter(|o| o.success).count(), outcomes.len())
        }
        ServerMessage::MaximizeWindowResult { session_id, success, error } => {
            format!("maximize_window_result: {session_id} success={success} error={error:?}")
        }
        ServerMessage::PositionBrowserLayoutResult { outcomes } => format!(
            "position_browser_layout_result: {}/{} succeeded",
            outcomes.iter().filter(|o| o.success).count(),
            outcomes.len()
        ),
        ServerMessage::SmartTileAddResult { success, repositioned, total_tiled, used_free_space, error, .. } => {
            format!(
                "smart_tile_add_result: success={success} repositioned={repositioned} total_tiled={total_tiled} \
                 used_free_space={used_free_space} error={error:?}"
            )
        }
        ServerMessage::CreateWorktreeResult { success, worktree, error } => {
            format!("create_worktree_result: success={success} worktree={worktree:?} error={error:?}")
        }
        ServerMessage::ListWorktreesResult { worktrees } => format!("list_worktrees_result: {} worktree(s)", worktrees.len()),
        ServerMessage::RemoveWorktreeResult { success, error } => {
            format!("remove_worktree_result: success={success} error={error:?}")
        }
        ServerMessage::LaunchSessionResult { success, error } => {
            format!("launch_session_result: success={success} error={error:?}")
        }
        ServerMessage::ToggleAutocompactResult { enabled } => format!("toggle_autocompact_result: {enabled}"),
        ServerMessage::UpdateNotificationSettingsResult { settings } => {
            format!("update_notification_settings_result: {settings:?}")
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
