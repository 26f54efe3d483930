// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dynamic-language debug adapter (§4.4.4): a thin in-process bdb-style
//! shim running inside the sandbox, driven over a line-oriented JSON
//! protocol. Unlike the console-debugger backends, every command here
//! produces its effect as an asynchronous event rather than a direct
//! reply, so no command-in-flight slot is needed — writes are simply
//! serialized under the child's stdin.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::{Child, ChildStdin};
use tokio::sync::mpsc;

use xrun_core::{is_within_workdir, normalize_path, BreakpointKey};

use crate::adapter_trait::DebugAdapter;
use crate::error::AdapterError;
use crate::event::AdapterEvent;
use crate::line_io::{spawn_line_reader, spawn_piped, write_line};

use super::wire::{ShimBreakpoint, ShimCommand, ShimEvent, ShimStackFrame};

pub struct DynamicAdapter {
    child: Child,
    stdin: ChildStdin,
    events_tx: mpsc::Sender<AdapterEvent>,
    events_rx: Option<mpsc::Receiver<AdapterEvent>>,
    workdir_mount: String,
}

impl DynamicAdapter {
    /// `shim_entry` is the bootstrap module the sandbox launcher materialized
    /// for the debug session; it imports the user's entry and drives it
    /// under the bdb-style shim (§4.1, §4.4.4).
    pub async fn launch(shim_entry: &str, args: &[String], cwd: &Path, workdir_mount: &str) -> Result<Self, AdapterError> {
        let mut shim_args = vec![shim_entry.to_string()];
        shim_args.extend(args.iter().cloned());
        let mut child = spawn_piped("python3", &shim_args, cwd)?;
        let stdout = child.stdout.take().ok_or_else(|| AdapterError::SpawnFailed("shim stdout missing".to_string()))?;
        let stdin = child.stdin.take().ok_or_else(|| AdapterError::SpawnFailed("shim stdin missing".to_string()))?;
        if let Some(stderr) = child.stderr.take() {
            spawn_line_reader(stderr, |line| tracing::debug!(target: "dynamic-shim", "{line}"));
        }

        let (events_tx, events_rx) = mpsc::channel(256);
        {
            let events_tx = events_tx.clone();
            spawn_line_reader(stdout, move |line| {
                match serde_json::from_str::<ShimEvent>(&line) {
                    Ok(event) => {
                        if let Some(event) = translate(event) {
                            let _ = events_tx.try_send(event);
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, line = %line, "malformed shim event"),
                }
            });
        }

        Ok(Self {
            child,
            stdin,
            events_tx,
            events_rx: Some(events_rx),
            workdir_mount: workdir_mount.to_string(),
        })
    }

    async fn send(&mut self, command: ShimCommand) -> Result<(), AdapterError> {
        let line = serde_json::to_string(&command).map_err(|e| AdapterError::CommandFailed(e.to_string()))?;
        write_line(&mut self.stdin, &line).await
    }
}

fn translate(event: ShimEvent) -> Option<AdapterEvent> {
    match event {
        ShimEvent::Stopped { file, line, function, stack, locals } => Some(AdapterEvent::Paused {
            file,
            line,
            function,
            stack: stack.into_iter().map(stack_frame_into_wire).collect(),
            locals,
        }),
        ShimEvent::Exception { message, file, line } => Some(AdapterEvent::Exception { message, file, line }),
        ShimEvent::EvaluateResult { expr, value, error } => Some(AdapterEvent::EvaluateResult { expr, value, error }),
        ShimEvent::BreakpointsSet { .. } => Some(AdapterEvent::BreakpointsSynced { added: None, removed: None }),
        ShimEvent::AwaitInput { .. } => Some(AdapterEvent::AwaitInput),
        ShimEvent::Output { data } => Some(AdapterEvent::Output { data }),
        ShimEvent::Terminated { code } => Some(AdapterEvent::Terminated { code }),
    }
}

fn stack_frame_into_wire(frame: ShimStackFrame) -> xrun_wire::StackFrame {
    xrun_wire::StackFrame { file: frame.file, line: frame.line, function: frame.function }
}

#[async_trait]
impl DebugAdapter for DynamicAdapter {
    async fn apply_breakpoints(&mut self, breakpoints: &[BreakpointKey]) -> Result<(), AdapterError> {
        let mut accepted = Vec::new();
        for key in breakpoints {
            if is_within_workdir(&key.file, &self.workdir_mount) {
                accepted.push(ShimBreakpoint {
                    file: normalize_path(&key.file, &self.workdir_mount),
                    line: key.line,
                });
            } else {
                tracing::debug!(file = %key.file, "breakpoint outside workdir rejected");
            }
        }
        self.send(ShimCommand::SetBreakpoints { breakpoints: accepted }).await
    }

    async fn continue_(&mut self) -> Result<(), AdapterError> {
        self.send(ShimCommand::Continue).await
    }

    async fn next(&mut self) -> Result<(), AdapterError> {
        self.send(ShimCommand::StepOver).await
    }

    async fn step_in(&mut self) -> Result<(), AdapterError> {
        self.send(ShimCommand::StepIn).await
    }

    async fn step_out(&mut self) -> Result<(), AdapterError> {
        self.send(ShimCommand::StepOut).await
    }

    async fn evaluate(&mut self, expr: &str) -> Result<(), AdapterError> {
        self.send(ShimCommand::Evaluate { expr: expr.to_string() }).await
    }

    async fn stop(&mut self) -> Result<(), AdapterError> {
        let _ = self.send(ShimCommand::Stop).await;
        let _ = self.child.kill().await;
        Ok(())
    }

    async fn send_input(&mut self, data: &str) -> Result<(), AdapterError> {
        self.send(ShimCommand::Stdin { data: data.to_string() }).await
    }

    fn take_events(&mut self) -> mpsc::Receiver<AdapterEvent> {
        self.events_rx.take().expect("take_events called twice")
    }
}

#[cfg(test)]
#[path = "shim_tests.rs"]
mod tests;
