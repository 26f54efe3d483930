// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session descriptor and lifecycle state (§3 Data Model: Session).

use crate::breakpoint::BreakpointKey;
use crate::error::ValidationError;
use crate::files::FileSet;
use crate::id::SessionId;
use crate::language::{Language, Mode};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a session (§3: Session.state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    New,
    DebugReady,
    Running,
    Stopping,
    Closed,
}

/// The immutable, validated description of a session, as accepted at
/// session-create time. Owned resources (child process, workdir) live in
/// `xrun-sandbox`/`xrun-supervisor`, not here — this type is pure data
/// (§3 invariant: "owned by exactly one supervisor").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescriptor {
    pub id: SessionId,
    pub language: Language,
    pub entry: String,
    pub args: Vec<String>,
    pub files: FileSet,
    pub mode: Mode,
    pub initial_breakpoints: Vec<BreakpointKey>,
}

impl SessionDescriptor {
    /// Validate a create-session request and build a descriptor (§6, §8
    /// property 5). Breakpoint file references are validated for filename
    /// shape only here; sandbox-mount canonicalization happens once the
    /// session's workdir mount path is known.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        language: Language,
        mode: Mode,
        entry: String,
        args: Vec<String>,
        files: Vec<(String, String)>,
        breakpoints: Vec<(String, u32)>,
    ) -> Result<Self, ValidationError> {
        let files = FileSet::new(files)?;
        if !files.contains(&entry) {
            return Err(ValidationError::EntryFileNotFound);
        }
        let mut initial_breakpoints = Vec::with_capacity(breakpoints.len());
        for (file, line) in breakpoints {
            if line < 1 {
                return Err(ValidationError::InvalidBreakpoint { file, line });
            }
            crate::files::validate_filename(&file)
                .map_err(|_| ValidationError::InvalidBreakpoint { file: file.clone(), line })?;
            initial_breakpoints.push(BreakpointKey { file, line });
        }
        Ok(Self {
            id: SessionId::new(),
            language,
            entry,
            args,
            files,
            mode,
            initial_breakpoints,
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
