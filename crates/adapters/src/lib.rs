// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! xrun-adapters: the uniform debug adapter protocol and its five backends
//! (spec.md §4.4) — gdb/MI for C++, jdb for Java, delve for Go, a
//! bdb-style shim for the dynamic language, and an inspector-based shim
//! for the JS runtime.

pub mod adapter_trait;
pub mod cpp;
pub mod dynamic;
pub mod error;
pub mod event;
mod inflight;
mod line_io;
pub mod jvm;
pub mod go;
pub mod js;

pub use adapter_trait::DebugAdapter;
pub use cpp::GdbAdapter;
pub use dynamic::DynamicAdapter;
pub use error::AdapterError;
pub use event::AdapterEvent;
pub use go::DelveAdapter;
pub use js::JsAdapter;
pub use jvm::JdbAdapter;
