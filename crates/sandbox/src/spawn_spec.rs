// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The spawn spec a [`crate::launcher::SandboxLauncher`] builds and hands
//! off to the supervisor/adapter layer for actual process creation (§4.1:
//! "Contract: `prepare(session) -> {workdir, spawn_spec}`").

use std::path::PathBuf;

use crate::limits::ResourceLimits;

/// How the run step's child should be attached for I/O (§4.1 "pty vs.
/// pipe fallback").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    /// Attach a pseudo-terminal with echo disabled.
    Pty,
    /// No pty available; use a line-buffering wrapper (e.g. `stdbuf -oL`)
    /// if the sandbox image carries one.
    LineBuffered,
    /// Raw pipes, no special buffering control.
    Raw,
}

/// A single process to spawn: either the compile step or the run step of
/// a prepared session.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
    pub limits: ResourceLimits,
    pub terminal_mode: TerminalMode,
}

impl SpawnSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: PathBuf, limits: ResourceLimits) -> Self {
        Self {
            program: program.into(),
            args,
            cwd,
            env: Vec::new(),
            limits,
            terminal_mode: TerminalMode::Raw,
        }
    }

    pub fn with_terminal_mode(mut self, mode: TerminalMode) -> Self {
        self.terminal_mode = mode;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
#[path = "spawn_spec_tests.rs"]
mod tests;
