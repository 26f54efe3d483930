// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duplex-stream frame schema (§6 "Duplex stream", §4.4 uniform debug
//! protocol).
//!
//! `output`, `await_input`, and `terminated` from the adapter-facing uniform
//! event set (§4.4) are folded onto the existing `out`/`err`,
//! `awaiting_input`, and `exit` server frames rather than minted as new
//! top-level frame kinds — see DESIGN.md for the reasoning.

use serde::{Deserialize, Serialize};

/// Client → server frames.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    In { data: String },
    Stop,
    Close,
    DebugCmd {
        command: DebugCommand,
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        line: Option<u32>,
        #[serde(default)]
        expr: Option<String>,
    },
    Stdin { data: String },
}

/// Uniform inbound debug command schema (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugCommand {
    Continue,
    Next,
    StepIn,
    StepOut,
    AddBreakpoint,
    RemoveBreakpoint,
    Evaluate,
    Stop,
}

/// Run-session status phases (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPhase {
    Starting,
    Exec,
    Running,
    Stopping,
}

/// Uniform outbound debug events (§4.4), carried as the `payload` of a
/// `debug_event` server frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DebugEvent {
    Paused {
        file: String,
        line: u32,
        function: String,
        stack: Vec<StackFrame>,
        locals: std::collections::BTreeMap<String, String>,
    },
    Breakpoints {
        synced: Option<bool>,
        added: Option<xrun_core::BreakpointKey>,
        removed: Option<xrun_core::BreakpointKey>,
    },
    EvaluateResult {
        expr: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Exception {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        file: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// Server → client frames.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Status { phase: StatusPhase },
    Out { data: String },
    Err { data: String },
    AwaitingInput {
        value: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
    DebugEvent {
        #[serde(flatten)]
        event: DebugEvent,
    },
    Exit {
        code: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ServerFrame {
    pub fn fatal_err(message: impl Into<String>) -> Self {
        ServerFrame::Err { data: message.into() }
    }
}

#[cfg(test)]
#[path = "frames_tests.rs"]
mod tests;
