// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xrun-sandbox: the Sandbox Launcher (spec.md §4.1) — materializes a
//! session's files into a workdir and builds the language-specific spawn
//! spec(s) the supervisor/adapter layer executes.

mod bootstrap;
mod error;
mod launcher;
mod limits;
mod spawn_spec;

pub use bootstrap::{render_dynamic_bootstrap, BOOTSTRAP_FILENAME, SENTINEL};
pub use error::SandboxError;
pub use launcher::{main_class_from_entry, PreparedSandbox, SandboxLauncher, CPP_BINARY, GO_BINARY, WORKDIR_MOUNT};
pub use limits::{MountMode, ResourceLimits, DEFAULT_CPU_CORES, DEFAULT_MEMORY_BYTES, DEFAULT_PID_CAP};
pub use spawn_spec::{SpawnSpec, TerminalMode};
