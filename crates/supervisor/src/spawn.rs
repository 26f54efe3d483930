// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns a [`xrun_sandbox::SpawnSpec`] into an actual `tokio::process::Command`.
//! Resource/network enforcement itself lives entirely in whatever external
//! sandbox binary the spec's `program` already points at (§4.1); this module
//! just spawns what it's told.

use std::process::Stdio;

use tokio::process::Command;

use xrun_sandbox::SpawnSpec;

pub fn command_from_spec(spec: &SpawnSpec) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.cwd)
        .kill_on_drop(true)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in &spec.env {
        cmd.env(key, value);
    }
    cmd
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
