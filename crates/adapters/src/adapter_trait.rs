// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform debug-adapter surface (§4.4, §9 "Polymorphic adapters").
//!
//! Every backend (gdb/MI, jdb, delve, the dynamic-language shim, the
//! JS-style runtime shim) implements this trait, so the session supervisor
//! (§4.6) never branches on [`xrun_core::Language`] once a session is
//! debug-ready.

use async_trait::async_trait;
use tokio::sync::mpsc;
use xrun_core::BreakpointKey;

use crate::error::AdapterError;
use crate::event::AdapterEvent;

#[async_trait]
pub trait DebugAdapter: Send {
    /// Add or remove breakpoints to match `breakpoints` exactly, emitting one
    /// `BreakpointsSynced` event per change (§4.4 "apply_breakpoints").
    async fn apply_breakpoints(&mut self, breakpoints: &[BreakpointKey]) -> Result<(), AdapterError>;

    async fn continue_(&mut self) -> Result<(), AdapterError>;
    async fn next(&mut self) -> Result<(), AdapterError>;
    async fn step_in(&mut self) -> Result<(), AdapterError>;
    async fn step_out(&mut self) -> Result<(), AdapterError>;

    /// Evaluate `expr` in the current frame, emitting exactly one
    /// `EvaluateResult` event.
    async fn evaluate(&mut self, expr: &str) -> Result<(), AdapterError>;

    /// Request termination of the debuggee and the backend process.
    async fn stop(&mut self) -> Result<(), AdapterError>;

    /// Forward raw bytes to the debuggee's stdin, for backends that proxy
    /// the target's own terminal (gdb via a pty; the dynamic/js shims
    /// directly). Backends with no such channel (jdb, delve run their
    /// target without an interactive stdin path) return `Ok(())` and drop
    /// the bytes.
    async fn send_input(&mut self, data: &str) -> Result<(), AdapterError>;

    /// Take ownership of this adapter's event stream. Called exactly once,
    /// immediately after construction; panics if called twice.
    fn take_events(&mut self) -> mpsc::Receiver<AdapterEvent>;
}

#[cfg(test)]
#[path = "adapter_trait_tests.rs"]
mod tests;
