// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Supervisor, debug mode (§4.6): translates the uniform client
//! debug-command schema into [`xrun_adapters::DebugAdapter`] calls, and the
//! adapter's uniform event stream back into [`ServerFrame`]s.

use std::time::Duration;

use tokio::sync::mpsc;

use xrun_adapters::{AdapterEvent, DebugAdapter};
use xrun_core::BreakpointKey;
use xrun_wire::{ClientFrame, DebugCommand, DebugEvent, ServerFrame, StatusPhase};

use crate::watchdog::DEFAULT_WATCHDOG;

pub async fn run(
    adapter: Box<dyn DebugAdapter>,
    workdir_mount: String,
    initial_breakpoints: Vec<BreakpointKey>,
    client_rx: mpsc::Receiver<ClientFrame>,
    out_tx: mpsc::Sender<ServerFrame>,
) -> i32 {
    run_with_watchdog(adapter, workdir_mount, initial_breakpoints, client_rx, out_tx, DEFAULT_WATCHDOG).await
}

pub async fn run_with_watchdog(
    mut adapter: Box<dyn DebugAdapter>,
    workdir_mount: String,
    initial_breakpoints: Vec<BreakpointKey>,
    mut client_rx: mpsc::Receiver<ClientFrame>,
    out_tx: mpsc::Sender<ServerFrame>,
    watchdog: Duration,
) -> i32 {
    let mut events_rx = adapter.take_events();

    let mut breakpoints: Vec<BreakpointKey> = initial_breakpoints
        .into_iter()
        .map(|bp| BreakpointKey::new(&bp.file, bp.line, &workdir_mount))
        .collect();
    if !breakpoints.is_empty() {
        let _ = adapter.apply_breakpoints(&breakpoints).await;
    }
    // The WS upgrade is the attach action; there is no separate client
    // command for it. Sync whatever breakpoints were configured at
    // session-create time, then start the debuggee running immediately,
    // same as the original debugger shim's startup sequence.
    let _ = adapter.continue_().await;

    let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Running }).await;

    let mut paused = false;
    let mut closing = false;

    let sleep = tokio::time::sleep(watchdog);
    tokio::pin!(sleep);

    let exit_code = loop {
        tokio::select! {
            event = events_rx.recv() => {
                match event {
                    Some(AdapterEvent::Terminated { code }) => break code,
                    Some(event) => {
                        if matches!(event, AdapterEvent::Paused { .. }) {
                            paused = true;
                        }
                        emit_event(&out_tx, event).await;
                    }
                    None => break -1,
                }
            }
            client = client_rx.recv(), if !closing => {
                match client {
                    Some(ClientFrame::DebugCmd { command, file, line, expr }) => {
                        handle_command(adapter.as_mut(), &workdir_mount, &mut breakpoints, &mut paused, &out_tx, command, file, line, expr).await;
                    }
                    Some(ClientFrame::In { data }) | Some(ClientFrame::Stdin { data }) => {
                        let _ = adapter.send_input(&data).await;
                    }
                    Some(ClientFrame::Stop) | Some(ClientFrame::Close) => {
                        let _ = out_tx.send(ServerFrame::Status { phase: StatusPhase::Stopping }).await;
                        let _ = adapter.stop().await;
                        closing = true;
                    }
                    None => {
                        let _ = adapter.stop().await;
                        closing = true;
                    }
                }
            }
            _ = &mut sleep => {
                let _ = adapter.stop().await;
                break -1;
            }
        }
    };

    let _ = out_tx.send(ServerFrame::Exit { code: exit_code, reason: None }).await;
    exit_code
}

#[allow(clippy::too_many_arguments)]
async fn handle_command(
    adapter: &mut dyn DebugAdapter,
    workdir_mount: &str,
    breakpoints: &mut Vec<BreakpointKey>,
    paused: &mut bool,
    out_tx: &mpsc::Sender<ServerFrame>,
    command: DebugCommand,
    file: Option<String>,
    line: Option<u32>,
    expr: Option<String>,
) {
    match command {
        DebugCommand::Continue => {
            *paused = false;
            let _ = adapter.continue_().await;
        }
        DebugCommand::Next => {
            *paused = false;
            let _ = adapter.next().await;
        }
        DebugCommand::StepIn => {
            *paused = false;
            let _ = adapter.step_in().await;
        }
        DebugCommand::StepOut => {
            *paused = false;
            let _ = adapter.step_out().await;
        }
        DebugCommand::Stop => {
            let _ = adapter.stop().await;
        }
        DebugCommand::AddBreakpoint => {
            let Some(file) = file else { return };
            let Some(line) = line else { return };
            let key = BreakpointKey::new(&file, line, workdir_mount);
            if !breakpoints.contains(&key) {
                breakpoints.push(key);
            }
            let _ = adapter.apply_breakpoints(breakpoints).await;
        }
        DebugCommand::RemoveBreakpoint => {
            let Some(file) = file else { return };
            let Some(line) = line else { return };
            let key = BreakpointKey::new(&file, line, workdir_mount);
            breakpoints.retain(|k| k != &key);
            let _ = adapter.apply_breakpoints(breakpoints).await;
        }
        DebugCommand::Evaluate => {
            let Some(expr) = expr else { return };
            if !*paused {
                let _ = out_tx
                    .send(ServerFrame::DebugEvent {
                        event: DebugEvent::EvaluateResult { expr, value: None, error: Some("not paused".to_string()) },
                    })
                    .await;
                return;
            }
            let _ = adapter.evaluate(&expr).await;
        }
    }
}

async fn emit_event(out_tx: &mpsc::Sender<ServerFrame>, event: AdapterEvent) {
    let frame = match event {
        AdapterEvent::Output { data } => ServerFrame::Out { data },
        AdapterEvent::AwaitInput => ServerFrame::AwaitingInput { value: true, prompt: None },
        AdapterEvent::Terminated { code } => ServerFrame::Exit { code, reason: None },
        AdapterEvent::Paused { file, line, function, stack, locals } => {
            ServerFrame::DebugEvent { event: DebugEvent::Paused { file, line, function, stack, locals } }
        }
        AdapterEvent::BreakpointsSynced { added, removed } => {
            ServerFrame::DebugEvent { event: DebugEvent::Breakpoints { synced: Some(true), added, removed } }
        }
        AdapterEvent::EvaluateResult { expr, value, error } => {
            ServerFrame::DebugEvent { event: DebugEvent::EvaluateResult { expr, value, error } }
        }
        AdapterEvent::Exception { message, file, line } => ServerFrame::DebugEvent { event: DebugEvent::Exception { message, file, line } },
    };
    let _ = out_tx.send(frame).await;
}

#[cfg(test)]
#[path = "debug_session_tests.rs"]
mod tests;
