// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supported languages and their execution mode (§3 Data Model).

use serde::{Deserialize, Serialize};

/// A supported language, and implicitly which sandbox image / debug backend
/// it maps to (§4.1, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    /// The bdb-based dynamic language (§4.4.4).
    Dynamic,
    /// The CDP-based scripting runtime (§4.4.5).
    Script,
    /// C++ compiled with debug symbols, debugged via gdb/MI (§4.4.1).
    SystemsCpp,
    /// Java, debugged via jdb (§4.4.2).
    Jvm,
    /// Go, debugged via delve (§4.4.3).
    CompiledGo,
}

impl Language {
    /// Whether sessions of this language require a compile step before running.
    pub fn is_compiled(self) -> bool {
        matches!(self, Language::SystemsCpp | Language::Jvm | Language::CompiledGo)
    }

    /// Whether the debug backend speaks a framed, non-self-delimited dialect
    /// that needs the single-slot in-flight command mutex (§5).
    pub fn has_unframed_debug_protocol(self) -> bool {
        matches!(self, Language::SystemsCpp | Language::Jvm | Language::CompiledGo)
    }
}

/// Run vs. debug (§3 Data Model: Session.mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Run,
    Debug,
}

#[cfg(test)]
#[path = "language_tests.rs"]
mod tests;
