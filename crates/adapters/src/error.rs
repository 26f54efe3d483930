// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter error type shared by all five debug backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("adapter timed out waiting for a reply")]
    Timeout,

    #[error("adapter process terminated")]
    Terminated,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
