//! Test helpers for behavioral specifications.
//!
//! Black-box: spins up the real `xrund` binary, drives it over HTTP (session
//! create) and WebSocket (duplex stream), and asserts on the frames it sends
//! back.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree into a
/// shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

fn xrund_binary() -> PathBuf {
    binary_path("xrund")
}

/// Poll a condition until it returns true or the timeout is reached.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

/// Reserve an ephemeral localhost port by binding and immediately releasing it.
fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("should bind ephemeral port");
    listener.local_addr().expect("should have local addr").port()
}

/// A running `xrund` daemon bound to an ephemeral localhost port, killed on drop.
pub struct Daemon {
    child: Child,
    pub http_base: String,
}

impl Daemon {
    /// Start `xrund` with a fresh ephemeral port and the default 60s
    /// watchdog, and wait for it to accept connections.
    pub fn start() -> Self {
        Self::start_with_watchdog_secs(60)
    }

    /// Same as [`Daemon::start`] but with an overridden watchdog, for
    /// scenarios that need the watchdog to fire quickly.
    pub fn start_with_watchdog_secs(watchdog_secs: u64) -> Self {
        let port = free_port();
        let bind = format!("127.0.0.1:{port}");

        let child = Command::new(xrund_binary())
            .env("XRUND_BIND", &bind)
            .env("XRUND_WATCHDOG_SECS", watchdog_secs.to_string())
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("xrund should spawn");

        let ready = wait_for(SPEC_WAIT_MAX_MS, || TcpStream::connect(&bind).is_ok());
        assert!(ready, "xrund should start listening on {bind}");

        Self { child, http_base: format!("http://{bind}") }
    }

    /// `POST /sessions`. Returns the parsed response body on success, or
    /// `(status, body)` on a 4xx rejection.
    pub async fn create(&self, body: Value) -> Result<Value, (u16, Value)> {
        let resp = reqwest::Client::new()
            .post(format!("{}/sessions", self.http_base))
            .json(&body)
            .send()
            .await
            .expect("create request should send");
        let status = resp.status();
        let json: Value = resp.json().await.expect("create response should be json");
        if status.is_success() {
            Ok(json)
        } else {
            Err((status.as_u16(), json))
        }
    }

    /// Open the duplex WS stream for a session created with [`Daemon::create`].
    pub async fn connect(&self, ws_url: &str) -> Session {
        let (stream, _) = connect_async(ws_url).await.expect("ws handshake should succeed");
        Session { stream }
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// A connected duplex stream, with helpers for sending client frames and
/// asserting on server frames by `type`.
pub struct Session {
    stream: WsStream,
}

impl Session {
    pub async fn send(&mut self, frame: Value) {
        self.stream.send(Message::Text(frame.to_string().into())).await.expect("frame should send");
    }

    pub async fn send_in(&mut self, data: &str) {
        self.send(json!({"type": "in", "data": data})).await;
    }

    pub async fn send_stop(&mut self) {
        self.send(json!({"type": "stop"})).await;
    }

    pub async fn send_debug_cmd(&mut self, body: Value) {
        let mut frame = json!({"type": "debug_cmd"});
        for (k, v) in body.as_object().expect("debug_cmd body should be an object") {
            frame[k] = v.clone();
        }
        self.send(frame).await;
    }

    /// Receive the next server frame, with a generous per-frame timeout —
    /// tests fail fast rather than hanging when a frame never arrives.
    pub async fn recv(&mut self) -> Value {
        self.recv_timeout(Duration::from_secs(5)).await.expect("a frame should arrive before the timeout")
    }

    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<Value> {
        loop {
            let next = tokio::time::timeout(timeout, self.stream.next()).await.ok()??;
            match next {
                Ok(Message::Text(text)) => return Some(serde_json::from_str(&text).expect("server frame should be json")),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    }

    /// Receive frames until one matches `frame_type`, asserting that every
    /// skipped frame is one of `allowed_type` (prevents silently swallowing
    /// an unexpected frame).
    pub async fn recv_until(&mut self, frame_type: &str, allowed: &[&str]) -> Value {
        loop {
            let frame = self.recv().await;
            let ty = frame["type"].as_str().unwrap_or_default();
            if ty == frame_type {
                return frame;
            }
            assert!(allowed.contains(&ty), "unexpected frame while waiting for '{frame_type}': {frame}");
        }
    }
}

pub fn dynamic_session(entry: &str, content: &str) -> Value {
    json!({
        "lang": "dynamic",
        "entry": entry,
        "args": [],
        "files": [{"name": entry, "content": content}],
        "mode": "run",
        "breakpoints": [],
    })
}

pub fn dynamic_debug_session(entry: &str, content: &str, breakpoints: Vec<(&str, u32)>) -> Value {
    json!({
        "lang": "dynamic",
        "entry": entry,
        "args": [],
        "files": [{"name": entry, "content": content}],
        "mode": "debug",
        "breakpoints": breakpoints.into_iter().map(|(file, line)| json!({"file": file, "line": line})).collect::<Vec<_>>(),
    })
}

pub fn cpp_debug_session(entry: &str, content: &str, breakpoints: Vec<(&str, u32)>) -> Value {
    json!({
        "lang": "systems-cpp",
        "entry": entry,
        "args": [],
        "files": [{"name": entry, "content": content}],
        "mode": "debug",
        "breakpoints": breakpoints.into_iter().map(|(file, line)| json!({"file": file, "line": line})).collect::<Vec<_>>(),
    })
}
