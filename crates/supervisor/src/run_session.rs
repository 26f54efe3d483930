// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run Session (§4.3): plain execution, no debugger attached.
//!
//! Races four suspension points every iteration — next client frame, next
//! stdout/stderr chunk, child exit, watchdog expiry (§5) — and converges
//! every exit path on the same cleanup sequence (§4.6).

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use xrun_sandbox::PreparedSandbox;
use xrun_stream::{pump_stderr, pump_stdout, Frame as StreamFrame};
use xrun_wire::{ClientFrame, ServerFrame, StatusPhase};

use crate::cleanup::{terminate, GRACE_PERIOD};
use crate::spawn::command_from_spec;
use crate::watchdog::DEFAULT_WATCHDOG;

/// Run a plain-execution session to completion, emitting frames on `out_tx`
/// and consuming commands from `client_rx`. Returns the child's exit code
/// (the same value already sent as the terminal `exit` frame).
pub async fn run(prepared: &PreparedSandbox, client_rx: mpsc::Receiver<ClientFrame>, out_tx: mpsc::Sender<ServerFrame>) -> i32 {
    run_with_watchdog(prepared, client_rx, out_tx, DEFAULT_WATCHDOG).await
}

pub async fn run_with_watchdog(
    prepared: &PreparedSandbox,
    mut client_rx: mpsc::Receiver<ClientFrame>,
    out_tx: mpsc::Sender<ServerFrame>,
    watchdog: Duration,
) -> i32 {
    let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Starting }).await;

    if let Some(compile_spec) = &prepared.compile_spec {
        let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Exec }).await;
        match command_from_spec(compile_spec).output().await {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                let diagnostics = String::from_utf8_lossy(&output.stderr).into_owned();
                return fatal(&out_tx, diagnostics, "compile failed").await;
            }
            Err(e) => {
                return fatal(&out_tx, format!("sandbox spawn failed: {e}"), "spawn failed").await;
            }
        }
    }

    let mut cmd = command_from_spec(&prepared.run_spec);
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return fatal(&out_tx, format!("sandbox spawn failed: {e}"), "spawn failed").await,
    };

    let Some(mut stdin) = child.stdin.take() else {
        return fatal(&out_tx, "child stdin unavailable", "spawn failed").await;
    };
    let Some(stdout) = child.stdout.take() else {
        return fatal(&out_tx, "child stdout unavailable", "spawn failed").await;
    };
    let Some(stderr) = child.stderr.take() else {
        return fatal(&out_tx, "child stderr unavailable", "spawn failed").await;
    };

    let (stdout_tx, mut stdout_rx) = mpsc::channel::<StreamFrame>(256);
    let (stderr_tx, mut stderr_rx) = mpsc::channel::<String>(256);
    tokio::spawn(pump_stdout(stdout, stdout_tx));
    tokio::spawn(pump_stderr(stderr, stderr_tx));

    let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Running }).await;

    let mut awaiting_input = false;
    let mut stdout_done = false;
    let mut stderr_done = false;

    let sleep = tokio::time::sleep(watchdog);
    tokio::pin!(sleep);

    let exit_code = loop {
        tokio::select! {
            frame = stdout_rx.recv(), if !stdout_done => {
                match frame {
                    Some(StreamFrame::Output(data)) => {
                        let _ = out_tx.send(ServerFrame::Out { data }).await;
                    }
                    Some(StreamFrame::AwaitingInput) => {
                        if !awaiting_input {
                            awaiting_input = true;
                            let _ = out_tx.send(ServerFrame::AwaitingInput { value: true, prompt: None }).await;
                        }
                    }
                    None => stdout_done = true,
                }
            }
            line = stderr_rx.recv(), if !stderr_done => {
                match line {
                    Some(data) => { let _ = out_tx.send(ServerFrame::Err { data }).await; }
                    None => stderr_done = true,
                }
            }
            client = client_rx.recv() => {
                match client {
                    Some(ClientFrame::In { data }) | Some(ClientFrame::Stdin { data }) => {
                        // Broken-pipe on stdin is tolerated (§4.3): the child may
                        // have already exited, in which case child.wait() below
                        // reports the real outcome.
                        let _ = stdin.write_all(data.as_bytes()).await;
                        let _ = stdin.flush().await;
                        if awaiting_input {
                            awaiting_input = false;
                            let _ = out_tx.send(ServerFrame::AwaitingInput { value: false, prompt: None }).await;
                        }
                    }
                    Some(ClientFrame::Stop) | Some(ClientFrame::Close) => {
                        let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Stopping }).await;
                        break terminate(&mut child, GRACE_PERIOD).await;
                    }
                    Some(ClientFrame::DebugCmd { .. }) => {
                        let _ = out_tx.send(ServerFrame::fatal_err("debug commands are not valid in run mode")).await;
                    }
                    None => {
                        // Client disconnected: kill the child, emit no further frames (§7).
                        break terminate(&mut child, GRACE_PERIOD).await;
                    }
                }
            }
            status = child.wait() => {
                drain_pumps(&out_tx, &mut stdout_rx, &mut stderr_rx, stdout_done, stderr_done).await;
                break status.ok().and_then(|s| s.code()).unwrap_or(-1);
            }
            _ = &mut sleep => {
                let code = terminate(&mut child, GRACE_PERIOD).await;
                drain_pumps(&out_tx, &mut stdout_rx, &mut stderr_rx, stdout_done, stderr_done).await;
                break code;
            }
        }
    };

    let _ = out_tx.send(ServerFrame::Exit { code: exit_code, reason: None }).await;
    exit_code
}

/// Reads whatever `out`/`err` frames the pumps already had buffered (or were
/// about to hand over as the child's pipes closed) so the terminal `exit`
/// frame never races ahead of trailing output (§4.3).
async fn drain_pumps(
    out_tx: &mpsc::Sender<ServerFrame>,
    stdout_rx: &mut mpsc::Receiver<StreamFrame>,
    stderr_rx: &mut mpsc::Receiver<String>,
    stdout_done: bool,
    stderr_done: bool,
) {
    let mut stdout_done = stdout_done;
    let mut stderr_done = stderr_done;
    while !stdout_done || !stderr_done {
        tokio::select! {
            frame = stdout_rx.recv(), if !stdout_done => {
                match frame {
                    Some(StreamFrame::Output(data)) => { let _ = out_tx.send(ServerFrame::Out { data }).await; }
                    Some(StreamFrame::AwaitingInput) => {}
                    None => stdout_done = true,
                }
            }
            line = stderr_rx.recv(), if !stderr_done => {
                match line {
                    Some(data) => { let _ = out_tx.send(ServerFrame::Err { data }).await; }
                    None => stderr_done = true,
                }
            }
        }
    }
}

async fn fatal(out_tx: &mpsc::Sender<ServerFrame>, message: impl Into<String>, reason: &str) -> i32 {
    let _ = out_tx.send(ServerFrame::fatal_err(message)).await;
    let _ = out_tx.send(ServerFrame::Exit { code: -1, reason: Some(reason.to_string()) }).await;
    -1
}

#[cfg(test)]
#[path = "run_session_tests.rs"]
mod tests;
