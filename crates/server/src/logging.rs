// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup, following `oj-daemon`'s `setup_logging` (env-filter plus
//! a formatted layer) minus the file-rotation machinery — `xrund` runs in
//! the foreground under a process supervisor rather than daemonizing
//! itself, so stderr is the log sink.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
}
