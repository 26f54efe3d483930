// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-create request/response (§6 "Session create").

use serde::{Deserialize, Serialize};
use xrun_core::{Language, Mode, SessionId, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreakpointSpec {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub lang: Language,
    pub entry: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub files: Vec<FileEntry>,
    pub mode: Mode,
    #[serde(default)]
    pub breakpoints: Vec<BreakpointSpec>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: SessionId,
    pub ws_url: String,
}

/// The 400-style error body for a rejected create-session request (§6, §7).
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionError {
    pub detail: String,
}

impl From<ValidationError> for CreateSessionError {
    fn from(e: ValidationError) -> Self {
        Self { detail: e.detail() }
    }
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
