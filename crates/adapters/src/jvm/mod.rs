// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JVM debug adapter backend (§4.4.2): jdb driven as a line-oriented
//! console debugger.
//!
//! jdb's replies are not self-delimited: whatever it prints between one
//! prompt and the next is the "reply" to the command just sent, so this
//! backend batches lines until the prompt regex matches and hands that
//! batch to the [`CommandSlot`] waiter — mirroring the gdb/MI adapter's use
//! of the same single-command-in-flight primitive, but with the reply typed
//! as raw lines instead of a parsed MI record (§4.4, §5 "Open Question":
//! jdb is marker-only — only `Breakpoint hit`/`Step completed` lines are
//! treated as state transitions, nothing else in its chatty output is
//! parsed as structured state).

mod jdb;

pub use jdb::JdbAdapter;
