// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform event set every backend normalizes onto (§4.4).

use std::collections::BTreeMap;
use xrun_core::BreakpointKey;
use xrun_wire::StackFrame;

/// Events a [`crate::DebugAdapter`] emits on its event channel. The
/// supervisor (§4.6) translates these into [`xrun_wire::ServerFrame`]s —
/// `Output` and `AwaitInput` fold onto the existing `out`/`awaiting_input`
/// server frames rather than becoming `debug_event` payloads, matching how
/// the wire schema folds the same two uniform events (see
/// `xrun-wire/src/frames.rs`).
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterEvent {
    Paused {
        file: String,
        line: u32,
        function: String,
        stack: Vec<StackFrame>,
        locals: BTreeMap<String, String>,
    },
    BreakpointsSynced {
        added: Option<BreakpointKey>,
        removed: Option<BreakpointKey>,
    },
    EvaluateResult {
        expr: String,
        value: Option<String>,
        error: Option<String>,
    },
    Exception {
        message: String,
        file: Option<String>,
        line: Option<u32>,
    },
    Output {
        data: String,
    },
    AwaitInput,
    Terminated {
        code: i32,
    },
}
