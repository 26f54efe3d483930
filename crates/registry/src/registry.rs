// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session Registry (§4.5): an in-memory map from session id to session
//! record.
//!
//! Creation is atomic (a single locked insert). Attach takes the record out
//! of its slot, so a second attach on the same id — whether concurrent or
//! after the first has already taken it — finds the slot empty and fails
//! the same way an unknown id does. The slot itself, and the id, survive
//! until the supervisor calls [`SessionRegistry::remove`] on close; the
//! registry never otherwise forgets a live id (§3 invariant).

use std::collections::HashMap;

use parking_lot::Mutex;

use xrun_core::{SessionDescriptor, SessionId};
use xrun_sandbox::PreparedSandbox;

use crate::error::RegistryError;

/// Everything a supervisor needs to own and run one attached session.
pub struct SessionRecord {
    pub descriptor: SessionDescriptor,
    pub sandbox: PreparedSandbox,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Option<SessionRecord>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a newly created session. Returns the id for the caller to
    /// hand back to the client.
    pub fn create(&self, descriptor: SessionDescriptor, sandbox: PreparedSandbox) -> SessionId {
        let id = descriptor.id.clone();
        self.sessions.lock().insert(id.clone(), Some(SessionRecord { descriptor, sandbox }));
        id
    }

    /// Attach to `id`, taking ownership of its record. Fails with
    /// `InvalidSessionId` both for unknown ids and for ids already
    /// attached once (§3, §6).
    pub fn attach(&self, id: &SessionId) -> Result<SessionRecord, RegistryError> {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(id) {
            Some(slot) => slot.take().ok_or(RegistryError::InvalidSessionId),
            None => Err(RegistryError::InvalidSessionId),
        }
    }

    /// Forget `id` entirely. Called by the supervisor on session close
    /// (§4.5: "the registry never retains closed sessions").
    pub fn remove(&self, id: &SessionId) {
        self.sessions.lock().remove(id);
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
