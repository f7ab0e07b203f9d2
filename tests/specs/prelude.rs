//! Shared test harness: spawning a real `corrald` against an isolated
//! socket/port pair, and small WebSocket/ingress client helpers built on
//! the same wire types the daemon itself uses.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use corral_wire::{ClientMessage, ServerMessage};
use futures_util::{SinkExt, StreamExt};
use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::process::{Child, Command};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub const WAIT_MAX_MS: u64 = 2000;
pub const POLL_INTERVAL_MS: u64 = 10;

fn corrald_binary() -> PathBuf {
    assert_cmd::cargo::cargo_bin("corrald")
}

pub fn corralctl_binary() -> PathBuf {
    assert_cmd::cargo::cargo_bin("corralctl")
}

/// Picks a loopback TCP port that was free at the moment of the call, by
/// binding to port 0 and reading back the OS-assigned one, then dropping
/// the listener. Good enough to avoid collisions between parallel tests
/// within one process; a genuinely concurrent bind from outside the test
/// binary would still race, which is an accepted limitation of this
/// harness.
fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local_addr").port()
}

/// A running `corrald` instance under an isolated config, torn down on
/// drop. Mirrors the teacher's `Project` test fixture's "own temp dir,
/// kill the daemon on drop" shape.
pub struct CorralDaemon {
    child: Child,
    ingress_socket_path: PathBuf,
    ws_addr: String,
    _dir: tempfile::TempDir,
}

impl CorralDaemon {
    /// Starts `corrald` with a config file pointed at a fresh temp dir's
    /// ingress socket and a free loopback port, then waits for the
    /// ingress socket to appear before returning.
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let ingress_socket_path = dir.path().join("ingress.sock");
        let ws_port = free_port();
        let config_path = dir.path().join("config.toml");
        let notification_settings_path = dir.path().join("notifications.json");
        let autocompact_settings_path = dir.path().join("claude-settings.json");

        std::fs::write(
            &config_path,
            format!(
                "ingress_socket_path = {:?}\n\
                 ws_bind_addr = \"127.0.0.1\"\n\
                 ws_port = {ws_port}\n\
                 notification_settings_path = {:?}\n\
                 autocompact_settings_path = {:?}\n",
                ingress_socket_path.to_string_lossy(),
                notification_settings_path.to_string_lossy(),
                autocompact_settings_path.to_string_lossy(),
            ),
        )
        .expect("write config");

        let child = Command::new(corrald_binary())
            .arg("--config")
            .arg(&config_path)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .expect("spawn corrald");

        let daemon = Self { child, ingress_socket_path, ws_addr: format!("127.0.0.1:{ws_port}"), _dir: dir };
        daemon.wait_until_ready().await;
        daemon
    }

    async fn wait_until_ready(&self) {
        let deadline = std::time::Instant::now() + Duration::from_millis(WAIT_MAX_MS);
        loop {
            if self.ingress_socket_path.exists() && tokio_tungstenite::connect_async(self.ws_url()).await.is_ok() {
                return;
            }
            if std::time::Instant::now() >= deadline {
                panic!("corrald did not become ready within {WAIT_MAX_MS}ms");
            }
            tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.ws_addr)
    }

    pub fn ws_addr(&self) -> &str {
        &self.ws_addr
    }

    /// Opens a Unix stream to the ingress socket and writes one
    /// newline-terminated JSON record.
    pub async fn send_ingress_line(&self, line: &str) {
        use tokio::io::AsyncWriteExt;
        let mut stream = UnixStream::connect(&self.ingress_socket_path).await.expect("connect ingress socket");
        stream.write_all(line.as_bytes()).await.expect("write ingress line");
        stream.write_all(b"\n").await.expect("write newline");
    }
}

impl Drop for CorralDaemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A connected hub subscriber: reads [`ServerMessage`]s, writes
/// [`ClientMessage`]s, same role a real UI client plays.
pub struct HubClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl HubClient {
    pub async fn connect(daemon: &CorralDaemon) -> Self {
        let (stream, _response) = tokio_tungstenite::connect_async(daemon.ws_url()).await.expect("connect to hub");
        Self { stream }
    }

    /// Reads the next text frame and decodes it, skipping anything that
    /// isn't a text frame (pings, etc).
    pub async fn next_message(&mut self) -> ServerMessage {
        loop {
            let frame = tokio::time::timeout(Duration::from_millis(WAIT_MAX_MS), self.stream.next())
                .await
                .expect("timed out waiting for a hub message")
                .expect("hub closed the connection")
                .expect("websocket read error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("decode ServerMessage");
            }
        }
    }

    pub async fn send(&mut self, request: ClientMessage) {
        let text = serde_json::to_string(&request).expect("encode ClientMessage");
        self.stream.send(Message::Text(text.into())).await.expect("send request");
    }
}

/// Monotonic counter handed out to tests that need a unique wire-level
/// session id, so specs run in the same process without colliding.
static SESSION_COUNTER: AtomicU32 = AtomicU32::new(0);

pub fn unique_session_id(prefix: &str) -> String {
    let n = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}
