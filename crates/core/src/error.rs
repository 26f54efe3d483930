// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy (§7 Error Handling Design).

use thiserror::Error;

/// Validation errors surfaced at session-create time (§6, §7 "Validation").
///
/// These are always rejected before a workdir is materialized (§8 property 5).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unsupported language/mode")]
    UnsupportedLanguageMode,

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("entry file not found")]
    EntryFileNotFound,

    #[error("too many files (>{max})")]
    TooManyFiles { max: usize },

    #[error("file too large (>{max} bytes)")]
    FileTooLarge { max: usize },

    #[error("invalid breakpoint {file}:{line}")]
    InvalidBreakpoint { file: String, line: u32 },
}

impl ValidationError {
    /// The single-string detail the create-session response puts in its body (§6).
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
