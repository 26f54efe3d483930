// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! C++ debug adapter over gdb's MI2 interpreter (§4.4.1).
//!
//! MI commands/replies travel over gdb's own stdin/stdout. The debuggee's
//! terminal is a separate pty, attached with `-inferior-tty-set`, so
//! program I/O never collides with the MI channel. The pty reader/writer
//! wiring mirrors the pattern used for interactive shell sessions elsewhere
//! in this codebase (spawn_blocking reader thread, mpsc-fed writer task).

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use portable_pty::{native_pty_system, PtySize, SlavePty};
use tokio::process::{Child, ChildStdin};
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use xrun_core::BreakpointKey;
use xrun_stream::{Frame as StreamFrame, SentinelMultiplexer};
use xrun_wire::StackFrame;

use crate::adapter_trait::DebugAdapter;
use crate::error::AdapterError;
use crate::event::AdapterEvent;
use crate::inflight::{CommandSlot, DEFAULT_COMMAND_TIMEOUT};
use crate::line_io::{spawn_line_reader, spawn_piped, write_line};

use super::mi::{parse_line, MiRecord, MiValue};

struct MiResult {
    class: String,
    payload: BTreeMap<String, MiValue>,
}

pub struct GdbAdapter {
    child: Child,
    /// Shared with the stdout reader task so it can issue follow-up MI
    /// commands (`-stack-list-frames`, `-stack-list-variables`) once it sees
    /// `*stopped`, without needing `&mut self`.
    stdin: Arc<AsyncMutex<ChildStdin>>,
    slot: Arc<CommandSlot<MiResult>>,
    events_tx: mpsc::Sender<AdapterEvent>,
    events_rx: Option<mpsc::Receiver<AdapterEvent>>,
    pty_writer_tx: mpsc::UnboundedSender<Vec<u8>>,
    /// Kept open for the adapter's lifetime: gdb opens the tty by path, and
    /// closing our end early can tear the pty down before it does.
    _pty_slave: Box<dyn SlavePty + Send>,
    started: bool,
    breakpoint_numbers: HashMap<BreakpointKey, String>,
}

impl GdbAdapter {
    pub async fn launch(entry: &str, args: &[String], cwd: &Path) -> Result<Self, AdapterError> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize { rows: 24, cols: 80, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| AdapterError::SpawnFailed(format!("opening inferior pty: {e}")))?;
        let tty_path = pair
            .slave
            .tty_name()
            .ok_or_else(|| AdapterError::SpawnFailed("pty slave has no tty path".to_string()))?;

        let mut mi_args = vec!["--interpreter=mi2".to_string(), "-q".to_string(), "--args".to_string(), entry.to_string()];
        mi_args.extend(args.iter().cloned());
        let mut child = spawn_piped("gdb", &mi_args, cwd)?;
        let stdout = child.stdout.take().ok_or_else(|| AdapterError::SpawnFailed("gdb stdout missing".to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| AdapterError::SpawnFailed("gdb stdin missing".to_string()))?;

        let (events_tx, events_rx) = mpsc::channel(256);

        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, |line| tracing::debug!(target: "gdb", "{line}"));
        }
        let slot: Arc<CommandSlot<MiResult>> = Arc::new(CommandSlot::new());
        let stdin = Arc::new(AsyncMutex::new(stdin));

        {
            let slot = slot.clone();
            let events_tx = events_tx.clone();
            let stdin = stdin.clone();
            spawn_line_reader(stdout, move |line| dispatch_mi_line(&line, &stdin, &slot, &events_tx));
        }

        // Pty reader: blocking thread reads raw bytes, an async task turns
        // them into Output/AwaitInput adapter events via the same sentinel
        // scanner the run-session path uses (compiled binaries never emit
        // the sentinel, but the no-trailing-newline heuristic still fires).
        let mut pty_reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| AdapterError::SpawnFailed(format!("cloning pty reader: {e}")))?;
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        std::thread::spawn(move || {
            let mut buf = [0u8; 1024];
            loop {
                match pty_reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if raw_tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        {
            let events_tx = events_tx.clone();
            tokio::spawn(async move {
                let mut mux = SentinelMultiplexer::new();
                while let Some(chunk) = raw_rx.recv().await {
                    for frame in mux.feed(&chunk) {
                        let event = match frame {
                            StreamFrame::Output(data) => AdapterEvent::Output { data },
                            StreamFrame::AwaitingInput => AdapterEvent::AwaitInput,
                        };
                        let _ = events_tx.try_send(event);
                    }
                }
                if let Some(StreamFrame::Output(data)) = mux.flush() {
                    let _ = events_tx.try_send(AdapterEvent::Output { data });
                }
            });
        }

        let pty_writer = pair
            .master
            .take_writer()
            .map_err(|e| AdapterError::SpawnFailed(format!("taking pty writer: {e}")))?;
        let pty_writer = std::sync::Mutex::new(pty_writer);
        let (pty_writer_tx, mut pty_writer_rx) = mpsc::unbounded_channel::<Vec<u8>>();
        tokio::task::spawn_blocking(move || {
            use std::io::Write;
            while let Some(bytes) = pty_writer_rx.blocking_recv() {
                if let Ok(mut w) = pty_writer.lock() {
                    let _ = w.write_all(&bytes);
                    let _ = w.flush();
                }
            }
        });

        let mut adapter = Self {
            child,
            stdin,
            slot,
            events_tx,
            events_rx: Some(events_rx),
            pty_writer_tx,
            _pty_slave: pair.slave,
            started: false,
            breakpoint_numbers: HashMap::new(),
        };
        adapter.run_command(&format!("-inferior-tty-set {tty_path}")).await?;
        Ok(adapter)
    }

    async fn run_command(&mut self, command: &str) -> Result<MiResult, AdapterError> {
        run_mi_command(&self.stdin, &self.slot, command).await
    }
}

/// Write `command` and wait for its `^done`/`^error` reply, serialized
/// through `slot` the same way [`GdbAdapter::run_command`] does. Free
/// function so the stdout reader task can issue follow-up commands (the
/// post-stop stack/locals snapshot) without `&mut GdbAdapter`.
async fn run_mi_command(stdin: &Arc<AsyncMutex<ChildStdin>>, slot: &CommandSlot<MiResult>, command: &str) -> Result<MiResult, AdapterError> {
    let stdin = stdin.clone();
    let line = command.to_string();
    slot.run(DEFAULT_COMMAND_TIMEOUT, move || async move {
        let mut stdin = stdin.lock().await;
        write_line(&mut stdin, &line).await
    })
    .await
}

fn dispatch_mi_line(line: &str, stdin: &Arc<AsyncMutex<ChildStdin>>, slot: &Arc<CommandSlot<MiResult>>, events_tx: &mpsc::Sender<AdapterEvent>) {
    match parse_line(line) {
        MiRecord::Result { class, payload, .. } => slot.fulfill(MiResult { class, payload }),
        MiRecord::ExecAsync { class, payload } if class == "stopped" => {
            handle_stopped(payload, stdin.clone(), slot.clone(), events_tx.clone());
        }
        MiRecord::Target(text) => {
            let _ = events_tx.try_send(AdapterEvent::Output { data: text });
        }
        _ => {}
    }
}

/// On `*stopped`, either emit `Terminated` (program exited) or, for a real
/// pause, issue `-stack-list-frames` and `-stack-list-variables
/// --all-values` before emitting a single `Paused` carrying the snapshot
/// (§4.4.1: "then issue ... and emit a single `paused`"). Spawned rather
/// than awaited inline since `dispatch_mi_line` runs synchronously from the
/// stdout reader's line loop and must return to keep reading — the MI
/// replies to these follow-up commands arrive on that same loop.
fn handle_stopped(payload: BTreeMap<String, MiValue>, stdin: Arc<AsyncMutex<ChildStdin>>, slot: Arc<CommandSlot<MiResult>>, events_tx: mpsc::Sender<AdapterEvent>) {
    let reason = payload.get("reason").and_then(MiValue::as_str).unwrap_or("").to_string();
    if reason.contains("exited") {
        let code = payload
            .get("exit-code")
            .and_then(MiValue::as_str)
            .and_then(|s| s.trim_start_matches("0x").parse::<i32>().ok())
            .unwrap_or(0);
        let _ = events_tx.try_send(AdapterEvent::Terminated { code });
        return;
    }
    let Some(frame) = payload.get("frame").and_then(MiValue::as_tuple).cloned() else { return };
    let file = frame.get("file").and_then(MiValue::as_str).unwrap_or_default().to_string();
    let line: u32 = frame.get("line").and_then(MiValue::as_str).and_then(|s| s.parse().ok()).unwrap_or(0);
    let function = frame.get("func").and_then(MiValue::as_str).unwrap_or_default().to_string();

    tokio::spawn(async move {
        let stack = match run_mi_command(&stdin, &slot, "-stack-list-frames").await {
            Ok(result) if result.class == "done" => parse_stack_frames(&result.payload),
            _ => Vec::new(),
        };
        let locals = match run_mi_command(&stdin, &slot, "-stack-list-variables --all-values").await {
            Ok(result) if result.class == "done" => parse_locals(&result.payload),
            _ => BTreeMap::new(),
        };
        let _ = events_tx.send(AdapterEvent::Paused { file, line, function, stack, locals }).await;
    });
}

/// `-stack-list-frames`'s reply shape: `stack=[frame={level="0",file="...",
/// line="5",func="main",...},frame={...}]`.
fn parse_stack_frames(payload: &BTreeMap<String, MiValue>) -> Vec<StackFrame> {
    let Some(list) = payload.get("stack").and_then(MiValue::as_list) else { return Vec::new() };
    list.iter()
        .filter_map(|item| {
            let tuple = item.as_tuple()?;
            let frame = tuple.get("frame").and_then(MiValue::as_tuple).unwrap_or(tuple);
            Some(StackFrame {
                file: frame.get("file").and_then(MiValue::as_str).unwrap_or_default().to_string(),
                line: frame.get("line").and_then(MiValue::as_str).and_then(|s| s.parse().ok()).unwrap_or(0),
                function: frame.get("func").and_then(MiValue::as_str).unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// `-stack-list-variables --all-values`'s reply shape:
/// `variables=[{name="i",value="1"},{name="sum",value="6"}]`.
fn parse_locals(payload: &BTreeMap<String, MiValue>) -> BTreeMap<String, String> {
    let Some(list) = payload.get("variables").and_then(MiValue::as_list) else { return BTreeMap::new() };
    list.iter()
        .filter_map(|item| {
            let tuple = item.as_tuple()?;
            let name = tuple.get("name").and_then(MiValue::as_str)?.to_string();
            let value = tuple.get("value").and_then(MiValue::as_str).unwrap_or_default().to_string();
            Some((name, value))
        })
        .collect()
}

#[async_trait]
impl DebugAdapter for GdbAdapter {
    async fn apply_breakpoints(&mut self, breakpoints: &[BreakpointKey]) -> Result<(), AdapterError> {
        let desired: std::collections::HashSet<_> = breakpoints.iter().cloned().collect();
        let current: Vec<BreakpointKey> = self.breakpoint_numbers.keys().cloned().collect();

        for key in current {
            if !desired.contains(&key) {
                if let Some(number) = self.breakpoint_numbers.remove(&key) {
                    self.run_command(&format!("-break-delete {number}")).await?;
                    let _ = self
                        .events_tx
                        .send(AdapterEvent::BreakpointsSynced { added: None, removed: Some(key) })
                        .await;
                }
            }
        }

        for key in breakpoints {
            if self.breakpoint_numbers.contains_key(key) {
                continue;
            }
            let result = self.run_command(&format!("-break-insert {}:{}", key.file, key.line)).await?;
            if result.class == "done" {
                if let Some(number) = result
                    .payload
                    .get("bkpt")
                    .and_then(MiValue::as_tuple)
                    .and_then(|t| t.get("number"))
                    .and_then(MiValue::as_str)
                {
                    self.breakpoint_numbers.insert(key.clone(), number.to_string());
                }
                let _ = self
                    .events_tx
                    .send(AdapterEvent::BreakpointsSynced { added: Some(key.clone()), removed: None })
                    .await;
            }
        }
        Ok(())
    }

    async fn continue_(&mut self) -> Result<(), AdapterError> {
        if self.started {
            self.run_command("-exec-continue").await?;
        } else {
            self.started = true;
            self.run_command("-exec-run").await?;
        }
        Ok(())
    }

    async fn next(&mut self) -> Result<(), AdapterError> {
        self.run_command("-exec-next").await?;
        Ok(())
    }

    async fn step_in(&mut self) -> Result<(), AdapterError> {
        self.run_command("-exec-step").await?;
        Ok(())
    }

    async fn step_out(&mut self) -> Result<(), AdapterError> {
        self.run_command("-exec-finish").await?;
        Ok(())
    }

    async fn evaluate(&mut self, expr: &str) -> Result<(), AdapterError> {
        let escaped = expr.replace('\\', "\\\\").replace('"', "\\\"");
        let result = self.run_command(&format!("-data-evaluate-expression \"{escaped}\"")).await?;
        let event = if result.class == "done" {
            AdapterEvent::EvaluateResult {
                expr: expr.to_string(),
                value: result.payload.get("value").and_then(MiValue::as_str).map(str::to_string),
                error: None,
            }
        } else {
            AdapterEvent::EvaluateResult {
                expr: expr.to_string(),
                value: None,
                error: result.payload.get("msg").and_then(MiValue::as_str).map(str::to_string),
            }
        };
        let _ = self.events_tx.send(event).await;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AdapterError> {
        {
            let mut stdin = self.stdin.lock().await;
            let _ = write_line(&mut stdin, "-gdb-exit").await;
        }
        let _ = self.child.kill().await;
        Ok(())
    }

    async fn send_input(&mut self, data: &str) -> Result<(), AdapterError> {
        let _ = self.pty_writer_tx.send(data.as_bytes().to_vec());
        Ok(())
    }

    fn take_events(&mut self) -> mpsc::Receiver<AdapterEvent> {
        self.events_rx.take().expect("take_events called twice")
    }
}

#[cfg(test)]
#[path = "gdb_tests.rs"]
mod tests;
