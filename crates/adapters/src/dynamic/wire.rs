// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented JSON protocol spoken with the in-sandbox bdb-style shim
//! (§4.4.4). Each line in either direction is exactly one JSON value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ShimCommand {
    Continue,
    StepOver,
    StepIn,
    StepOut,
    SetBreakpoints { breakpoints: Vec<ShimBreakpoint> },
    Evaluate { expr: String },
    Stop,
    Stdin { data: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ShimBreakpoint {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ShimEvent {
    Stopped {
        file: String,
        line: u32,
        function: String,
        #[serde(default)]
        stack: Vec<ShimStackFrame>,
        #[serde(default)]
        locals: BTreeMap<String, String>,
    },
    Exception {
        message: String,
        #[serde(default)]
        file: Option<String>,
        #[serde(default)]
        line: Option<u32>,
    },
    EvaluateResult {
        expr: String,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
    BreakpointsSet {
        #[serde(default)]
        rejected: Vec<ShimBreakpoint>,
    },
    AwaitInput {
        #[serde(default)]
        prompt: Option<String>,
    },
    Output {
        data: String,
    },
    Terminated {
        #[serde(default)]
        code: i32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShimStackFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}
