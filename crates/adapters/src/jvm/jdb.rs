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

static PROMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:>\s*|[\w.$]+\[\d+\]\s*)$").expect("constant regex pattern is valid"));
static BREAKPOINT_HIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Breakpoint hit:.*?, (?P<func>[\w.$]+)\(\)(?:, line=(?P<line>\d+))?"#)
        .expect("constant regex pattern is valid")
});
static STEP_COMPLETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Step completed:.*?, (?P<func>[\w.$]+)\(\)(?:, line=(?P<line>\d+))?"#)
        .expect("constant regex pattern is valid")
});
static EXCEPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^Exception occurred: (?P<msg>.+)$"#).expect("constant regex pattern is valid")
});
static WHERE_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[\d+\]\s+(?P<func>\S+)\s+\((?P<file>[\w.$]+\.java):(?P<line>\d+)\)"#)
        .expect("constant regex pattern is valid")
});
static LOCAL_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<name>[A-Za-z_]\w*)\s*=\s*(?P<value>.+)$").expect("constant regex pattern is valid"));

/// jdb replies as the raw lines printed between one prompt and the next.
type JdbReply = Vec<String>;

/// A pause detected mid-batch (the `Breakpoint hit`/`Step completed` line
/// itself carries no file, only a class-qualified function and line), held
/// until the enclosing command's reply batch completes so the follow-up
/// `where`/`locals` queries don't race the command still in flight.
struct PendingPause {
    line: u32,
    function: String,
}

pub struct JdbAdapter {
    child: Child,
    /// Shared with the stdout reader task so it can issue the post-pause
    /// `where`/`locals` snapshot queries without `&mut self`.
    stdin: Arc<AsyncMutex<ChildStdin>>,
    slot: Arc<CommandSlot<JdbReply>>,
    events_tx: mpsc::Sender<AdapterEvent>,
    events_rx: Option<mpsc::Receiver<AdapterEvent>>,
    main_class: String,
    breakpoints: HashMap<BreakpointKey, ()>,
}

impl JdbAdapter {
    /// Compile `source_file` (relative to `cwd`) and launch jdb against the
    /// resulting class (§4.4.2 "compile step").
    pub async fn launch(source_file: &str, main_class: &str, args: &[String], cwd: &Path) -> Result<Self, AdapterError> {
        let javac = tokio::process::Command::new("javac")
            .arg("-g")
            .arg(source_file)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|e| AdapterError::SpawnFailed(format!("javac: {e}")))?;
        if !javac.status.success() {
            return Err(AdapterError::SpawnFailed(format!(
                "javac failed: {}",
                String::from_utf8_lossy(&javac.stderr)
            )));
        }

        let mut jdb_args = vec![main_class.to_string()];
        jdb_args.extend(args.iter().cloned());
        let mut child = spawn_piped("jdb", &jdb_args, cwd)?;
        let stdout = child.stdout.take().ok_or_else(|| AdapterError::SpawnFailed("jdb stdout missing".to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| AdapterError::SpawnFailed("jdb stdin missing".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, |line| tracing::debug!(target: "jdb", "{line}"));
        }

        let (events_tx, events_rx) = mpsc::channel(256);
        let slot: Arc<CommandSlot<JdbReply>> = Arc::new(CommandSlot::new());
        let batch = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
        let stdin = Arc::new(AsyncMutex::new(stdin));
        let pending_pause: Arc<parking_lot::Mutex<Option<PendingPause>>> = Arc::new(parking_lot::Mutex::new(None));

        {
            let slot = slot.clone();
            let events_tx = events_tx.clone();
            let batch = batch.clone();
            let stdin = stdin.clone();
            let pending_pause = pending_pause.clone();
            spawn_line_reader(stdout, move |line| {
                if let Some(caps) = BREAKPOINT_HIT.captures(&line).or_else(|| STEP_COMPLETED.captures(&line)) {
                    *pending_pause.lock() = Some(PendingPause {
                        line: caps.name("line").and_then(|m| m.as_str().parse().ok()).unwrap_or(0),
                        function: caps.name("func").map(|m| m.as_str().to_string()).unwrap_or_default(),
                    });
                } else if let Some(event) = classify_line(&line) {
                    let _ = events_tx.try_send(event);
                }
                if PROMPT.is_match(line.trim_end()) {
                    let lines = std::mem::take(&mut *batch.lock());
                    slot.fulfill(lines);
                    if let Some(pause) = pending_pause.lock().take() {
                        spawn_pause_snapshot(pause, stdin.clone(), slot.clone(), events_tx.clone());
                    }
                } else {
                    batch.lock().push(line);
                }
            });
        }

        Ok(Self {
            child,
            stdin,
            slot,
            events_tx,
            events_rx: Some(events_rx),
            main_class: main_class.to_string(),
            breakpoints: HashMap::new(),
        })
    }

    async fn run_command(&mut self, command: &str) -> Result<JdbReply, AdapterError> {
        run_jdb_command(&self.stdin, &self.slot, command).await
    }

    fn class_qualified_location(&self, key: &BreakpointKey) -> String {
        format!("{}:{}", self.main_class, key.line)
    }
}

/// Write `command` and wait for its batched reply, serialized through `slot`
/// the same way [`JdbAdapter::run_command`] does. Free function so the
/// stdout reader task can issue the post-pause `where`/`locals` queries
/// without `&mut JdbAdapter`.
async fn run_jdb_command(stdin: &Arc<AsyncMutex<ChildStdin>>, slot: &CommandSlot<JdbReply>, command: &str) -> Result<JdbReply, AdapterError> {
    let stdin = stdin.clone();
    let line = command.to_string();
    slot.run(DEFAULT_COMMAND_TIMEOUT, move || async move {
        let mut stdin = stdin.lock().await;
        write_line(&mut stdin, &line).await
    })
    .await
}

/// On a detected pause, issue `where` and `locals` before emitting a single
/// `Paused` carrying the snapshot (§4.4.2: "parse `(File.java:line)`; then
/// issue `where` and `locals` to build the snapshot"). The breakpoint-hit
/// line itself carries no file, only the top `where` frame does, so `file`
/// comes from that query rather than the pause detection. Spawned rather
/// than awaited inline since this runs from the stdout reader's line loop,
/// which must keep reading to see the replies to these very queries.
fn spawn_pause_snapshot(pause: PendingPause, stdin: Arc<AsyncMutex<ChildStdin>>, slot: Arc<CommandSlot<JdbReply>>, events_tx: mpsc::Sender<AdapterEvent>) {
    tokio::spawn(async move {
        let stack = match run_jdb_command(&stdin, &slot, "where").await {
            Ok(lines) => parse_stack_frames(&lines),
            Err(_) => Vec::new(),
        };
        let locals = match run_jdb_command(&stdin, &slot, "locals").await {
            Ok(lines) => parse_locals(&lines),
            Err(_) => BTreeMap::new(),
        };
        let file = stack.first().map(|f| f.file.clone()).unwrap_or_default();
        let _ = events_tx
            .send(AdapterEvent::Paused { file, line: pause.line, function: pause.function, stack, locals })
            .await;
    });
}

/// `where`'s output is one `[n] Class.method (File.java:line)` line per
/// frame, top frame first.
fn parse_stack_frames(lines: &[String]) -> Vec<StackFrame> {
    lines
        .iter()
        .filter_map(|line| WHERE_FRAME.captures(line))
        .map(|caps| StackFrame {
            file: caps["file"].to_string(),
            line: caps["line"].parse().unwrap_or(0),
            function: caps["func"].to_string(),
        })
        .collect()
}

/// `locals`'s output is one `name = value` line per variable, under
/// `Method arguments:`/`Local variables:` headers that don't match.
fn parse_locals(lines: &[String]) -> BTreeMap<String, String> {
    lines.iter().filter_map(|line| LOCAL_VAR.captures(line)).map(|caps| (caps["name"].to_string(), caps["value"].to_string())).collect()
}

fn classify_line(line: &str) -> Option<AdapterEvent> {
    if let Some(caps) = EXCEPTION_LINE.captures(line) {
        return Some(AdapterEvent::Exception {
            message: caps["msg"].to_string(),
            file: None,
            line: None,
        });
    }
    if line.trim() == "The application exited" {
        return Some(AdapterEvent::Terminated { code: 0 });
    }
    None
}

#[async_trait]
impl DebugAdapter for JdbAdapter {
    async fn apply_breakpoints(&mut self, breakpoints: &[BreakpointKey]) -> Result<(), AdapterError> {
        let desired: std::collections::HashSet<_> = breakpoints.iter().cloned().collect();
        let current: Vec<BreakpointKey> = self.breakpoints.keys().cloned().collect();

        for key in current {
            if !desired.contains(&key) {
                let loc = self.class_qualified_location(&key);
                self.run_command(&format!("clear {loc}")).await?;
                self.breakpoints.remove(&key);
                let _ = self.events_tx.send(AdapterEvent::BreakpointsSynced { added: None, removed: Some(key) }).await;
            }
        }

        for key in breakpoints {
            if self.breakpoints.contains_key(key) {
                continue;
            }
            let loc = self.class_qualified_location(key);
            self.run_command(&format!("stop at {loc}")).await?;
            self.breakpoints.insert(key.clone(), ());
            let _ = self
                .events_tx
                .send(AdapterEvent::BreakpointsSynced { added: Some(key.clone()), removed: None })
                .await;
        }
        Ok(())
    }

    async fn continue_(&mut self) -> Result<(), AdapterError> {
        self.run_command("cont").await?;
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
        self.run_command("step up").await?;
        Ok(())
    }

    async fn evaluate(&mut self, expr: &str) -> Result<(), AdapterError> {
        let reply = self.run_command(&format!("print {expr}")).await?;
        let event = match reply.iter().find_map(|l| l.split_once(" = ")) {
            Some((_, value)) => AdapterEvent::EvaluateResult { expr: expr.to_string(), value: Some(value.to_string()), error: None },
            None => AdapterEvent::EvaluateResult {
                expr: expr.to_string(),
                value: None,
                error: Some(reply.join("\n")),
            },
        };
        let _ = self.events_tx.send(event).await;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AdapterError> {
        {
            let mut stdin = self.stdin.lock().await;
            let _ = write_line(&mut stdin, "exit").await;
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
#[path = "jdb_tests.rs"]
mod tests;
