// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xrun-supervisor: the per-session select loop, in both its run-mode
//! (§4.3) and debug-mode (§4.6) shapes, plus the child-process lifecycle
//! helpers (spawn, graceful termination, watchdog) both share.

pub mod cleanup;
pub mod debug_session;
pub mod run_session;
pub mod spawn;
pub mod watchdog;

pub use cleanup::{terminate, GRACE_PERIOD};
pub use spawn::command_from_spec;
pub use watchdog::DEFAULT_WATCHDOG;
