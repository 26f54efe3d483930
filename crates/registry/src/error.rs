// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry errors (§4.5, §6).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Returned both when the id was never issued and when it has already
    /// been attached once (§3 invariant: "a second attach attempt fails
    /// with 'invalid session_id'").
    #[error("invalid session_id")]
    InvalidSessionId,
}
