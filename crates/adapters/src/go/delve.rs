// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tokio::process::{Child, ChildStdin};
use tokio::sync::{mpsc, Mutex as AsyncMutex};

use xrun_core::BreakpointKey;
use xrun_wire::StackFrame;

use crate::adapter_trait::DebugAdapter;
use crate::error::AdapterError;
use crate::event::AdapterEvent;
use crate::inflight::{CommandSlot, DEFAULT_COMMAND_TIMEOUT};
use crate::line_io::{spawn_line_reader, spawn_piped, write_line};

const PROMPT: &str = "(dlv) ";

static PAUSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^>\s+(?P<func>\S+)\(\)\s+(?P<file>\S+):(?P<line>\d+)").expect("constant regex pattern is valid")
});
static BREAKPOINT_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Breakpoint (?P<id>\d+) set at").expect("constant regex pattern is valid")
});
static PROCESS_EXITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Process \d+ has exited with status (?P<code>-?\d+)").expect("constant regex pattern is valid")
});
static BT_FRAME_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s+0x[0-9a-fA-F]+\s+in\s+(?P<func>\S+)").expect("constant regex pattern is valid"));
static BT_FRAME_LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s+at\s+(?P<file>\S+):(?P<line>\d+)").expect("constant regex pattern is valid"));
static LOCAL_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[A-Za-z_]\w*)\s*=\s*(?P<value>.+)$").expect("constant regex pattern is valid"));

type DelveReply = Vec<String>;

/// A pause detected mid-batch, held until the enclosing command's reply
/// batch completes (the line carrying it is followed by more output and
/// only then the `(dlv) ` prompt), so the follow-up `bt`/`locals` queries
/// don't race the command that's still in flight.
struct PendingPause {
    file: String,
    line: u32,
    function: String,
}

pub struct DelveAdapter {
    child: Child,
    /// Shared with the stdout reader task so it can issue the post-pause
    /// `bt`/`locals` snapshot queries without `&mut self`.
    stdin: Arc<AsyncMutex<ChildStdin>>,
    slot: Arc<CommandSlot<DelveReply>>,
    events_tx: mpsc::Sender<AdapterEvent>,
    events_rx: Option<mpsc::Receiver<AdapterEvent>>,
    breakpoint_ids: HashMap<BreakpointKey, String>,
}

impl DelveAdapter {
    /// `binary` must already be built (§4.1 two-phase compile+run spawn spec).
    pub async fn launch(binary: &str, args: &[String], cwd: &Path) -> Result<Self, AdapterError> {
        let mut dlv_args = vec!["exec".to_string(), binary.to_string()];
        if !args.is_empty() {
            dlv_args.push("--".to_string());
            dlv_args.extend(args.iter().cloned());
        }
        let mut child = spawn_piped("dlv", &dlv_args, cwd)?;
        let stdout = child.stdout.take().ok_or_else(|| AdapterError::SpawnFailed("dlv stdout missing".to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| AdapterError::SpawnFailed("dlv stdin missing".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, |line| tracing::debug!(target: "dlv", "{line}"));
        }

        let (events_tx, events_rx) = mpsc::channel(256);
        let slot: Arc<CommandSlot<DelveReply>> = Arc::new(CommandSlot::new());
        let batch = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let stdin = Arc::new(AsyncMutex::new(stdin));
        let pending_pause: Arc<parking_lot::Mutex<Option<PendingPause>>> = Arc::new(parking_lot::Mutex::new(None));

        {
            let slot = slot.clone();
            let events_tx = events_tx.clone();
            let batch = batch.clone();
            let stdin = stdin.clone();
            let pending_pause = pending_pause.clone();
            spawn_line_reader(stdout, move |raw_line| {
                // delve doesn't always newline-terminate its prompt; the
                // line reader only sees full lines, so detect the prompt by
                // an exact match on the trimmed text dlv prints on its own.
                if raw_line.trim_end() == PROMPT.trim_end() {
                    let lines = std::mem::take(&mut *batch.lock());
                    slot.fulfill(lines);
                    if let Some(pause) = pending_pause.lock().take() {
                        spawn_pause_snapshot(pause, stdin.clone(), slot.clone(), events_tx.clone());
                    }
                    return;
                }
                if let Some(caps) = PAUSE_LINE.captures(&raw_line) {
                    *pending_pause.lock() = Some(PendingPause {
                        file: caps["file"].to_string(),
                        line: caps["line"].parse().unwrap_or(0),
                        function: caps["func"].to_string(),
                    });
                } else if let Some(event) = classify_line(&raw_line) {
                    let _ = events_tx.try_send(event);
                }
                batch.lock().push(raw_line);
            });
        }

        Ok(Self {
            child,
            stdin,
            slot,
            events_tx,
            events_rx: Some(events_rx),
            breakpoint_ids: HashMap::new(),
        })
    }

    async fn run_command(&mut self, command: &str) -> Result<DelveReply, AdapterError> {
        run_delve_command(&self.stdin, &self.slot, command).await
    }
}

/// Write `command` and wait for its batched reply (the lines printed before
/// the next `(dlv) ` prompt), serialized through `slot` the same way
/// [`DelveAdapter::run_command`] does. Free function so the stdout reader
/// task can issue the post-pause `bt`/`locals` queries without
/// `&mut DelveAdapter`.
async fn run_delve_command(stdin: &Arc<AsyncMutex<ChildStdin>>, slot: &CommandSlot<DelveReply>, command: &str) -> Result<DelveReply, AdapterError> {
    let stdin = stdin.clone();
    let line = command.to_string();
    slot.run(DEFAULT_COMMAND_TIMEOUT, move || async move {
        let mut stdin = stdin.lock().await;
        write_line(&mut stdin, &line).await
    })
    .await
}

/// On a detected pause, issue `bt` and `locals` before emitting a single
/// `Paused` carrying the snapshot (§4.4.3: "emit `paused` after `stack` and
/// `locals` queries"). Spawned rather than awaited inline since this runs
/// from the stdout reader's line loop, which must keep reading to see the
/// replies to these very queries.
fn spawn_pause_snapshot(pause: PendingPause, stdin: Arc<AsyncMutex<ChildStdin>>, slot: Arc<CommandSlot<DelveReply>>, events_tx: mpsc::Sender<AdapterEvent>) {
    tokio::spawn(async move {
        let stack = match run_delve_command(&stdin, &slot, "bt").await {
            Ok(lines) => parse_stack_frames(&lines),
            Err(_) => Vec::new(),
        };
        let locals = match run_delve_command(&stdin, &slot, "locals").await {
            Ok(lines) => parse_locals(&lines),
            Err(_) => BTreeMap::new(),
        };
        let _ = events_tx
            .send(AdapterEvent::Paused { file: pause.file, line: pause.line, function: pause.function, stack, locals })
            .await;
    });
}

/// `bt`'s output pairs a `N  0x... in some.func` header line with a
/// following `   at file:line` line.
fn parse_stack_frames(lines: &[String]) -> Vec<StackFrame> {
    let mut frames = Vec::new();
    let mut pending_func: Option<String> = None;
    for line in lines {
        if let Some(caps) = BT_FRAME_HEADER.captures(line) {
            pending_func = Some(caps["func"].to_string());
            continue;
        }
        if let Some(caps) = BT_FRAME_LOCATION.captures(line) {
            if let Some(function) = pending_func.take() {
                frames.push(StackFrame { file: caps["file"].to_string(), line: caps["line"].parse().unwrap_or(0), function });
            }
        }
    }
    frames
}

/// `locals`'s output is one `name = value` line per variable.
fn parse_locals(lines: &[String]) -> BTreeMap<String, String> {
    lines.iter().filter_map(|line| LOCAL_VAR.captures(line)).map(|caps| (caps["name"].to_string(), caps["value"].to_string())).collect()
}

fn classify_line(line: &str) -> Option<AdapterEvent> {
    if let Some(caps) = PROCESS_EXITED.captures(line) {
        return Some(AdapterEvent::Terminated { code: caps["code"].parse().unwrap_or(0) });
    }
    if let Some(rest) = line.strip_prefix("panic: ") {
        return Some(AdapterEvent::Exception { message: rest.to_string(), file: None, line: None });
    }
    None
}

#[async_trait]
impl DebugAdapter for DelveAdapter {
    async fn apply_breakpoints(&mut self, breakpoints: &[BreakpointKey]) -> Result<(), AdapterError> {
        let desired: std::collections::HashSet<_> = breakpoints.iter().cloned().collect();
        let current: Vec<BreakpointKey> = self.breakpoint_ids.keys().cloned().collect();

        for key in current {
            if !desired.contains(&key) {
                if let Some(id) = self.breakpoint_ids.remove(&key) {
                    self.run_command(&format!("clear {id}")).await?;
                    let _ = self.events_tx.send(AdapterEvent::BreakpointsSynced { added: None, removed: Some(key) }).await;
                }
            }
        }

        for key in breakpoints {
            if self.breakpoint_ids.contains_key(key) {
                continue;
            }
            let reply = self.run_command(&format!("break {}:{}", key.file, key.line)).await?;
            if let Some(id) = reply.iter().find_map(|l| BREAKPOINT_SET.captures(l)).and_then(|c| c.name("id")).map(|m| m.as_str().to_string()) {
                self.breakpoint_ids.insert(key.clone(), id);
            }
            let _ = self.events_tx.send(AdapterEvent::BreakpointsSynced { added: Some(key.clone()), removed: None }).await;
        }
        Ok(())
    }

    async fn continue_(&mut self) -> Result<(), AdapterError> {
        self.run_command("continue").await?;
        Ok(())
    }

    async fn next(&mut self) -> Result<(), AdapterError> {
        self.run_command("next").await?;
        Ok(())
    }

    async fn step_in(&mut self) -> Result<(), AdapterError> {
        self.run_command("step").await?;
        Ok(())
    }

    async fn step_out(&mut self) -> Result<(), AdapterError> {
        self.run_command("stepout").await?;
        Ok(())
    }

    async fn evaluate(&mut self, expr: &str) -> Result<(), AdapterError> {
        let reply = self.run_command(&format!("print {expr}")).await?;
        let joined = reply.join("\n");
        let event = if joined.starts_with("Command failed") || joined.contains("could not find symbol") {
            AdapterEvent::EvaluateResult { expr: expr.to_string(), value: None, error: Some(joined) }
        } else {
            AdapterEvent::EvaluateResult { expr: expr.to_string(), value: Some(joined.trim().to_string()), error: None }
        };
        let _ = self.events_tx.send(event).await;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AdapterError> {
        {
            let mut stdin = self.stdin.lock().await;
            let _ = write_line(&mut stdin, "quit").await;
            let _ = write_line(&mut stdin, "y").await;
        }
        let _ = self.child.kill().await;
        Ok(())
    }

    async fn send_input(&mut self, _data: &str) -> Result<(), AdapterError> {
        Ok(())
    }

    fn take_events(&mut self) -> mpsc::Receiver<AdapterEvent> {
        self.events_rx.take().expect("take_events called twice")
    }
}

#[cfg(test)]
#[path = "delve_tests.rs"]
mod tests;
