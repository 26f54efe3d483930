// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sandbox launcher errors (§4.1 "Failure modes").

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("sandbox binary unavailable: {0}")]
    BinaryUnavailable(String),

    #[error("compile failed: {diagnostics}")]
    CompileFailed { diagnostics: String },

    #[error("unsupported language/mode combination")]
    UnsupportedLanguageMode,

    #[error("workdir io error: {0}")]
    Io(#[from] std::io::Error),
}
