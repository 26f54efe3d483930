// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single command-in-flight gate for backends whose replies aren't
//! self-delimited (gdb/MI, jdb, delve — §4.4, §5).
//!
//! Each of those backends writes one command at a time and recognizes a
//! reply only by watching its stdout for a terminal marker line (a `(gdb)`
//! prompt, a `Breakpoint hit` line, a `(dlv)` prompt). [`CommandSlot`] makes
//! that synchronous-looking protocol safe to drive from async code: callers
//! serialize through an async mutex, and the backend's line-reader task
//! fulfills the outstanding reply by calling [`CommandSlot::fulfill`].

use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use crate::error::AdapterError;

/// Default time to wait for a backend reply before giving up (§4.6
/// watchdog default informs this, but command replies should land far
/// sooner than a full session timeout).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct CommandSlot<R> {
    gate: Mutex<()>,
    pending: parking_lot::Mutex<Option<oneshot::Sender<R>>>,
}

impl<R> Default for CommandSlot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> CommandSlot<R> {
    pub fn new() -> Self {
        Self {
            gate: Mutex::new(()),
            pending: parking_lot::Mutex::new(None),
        }
    }

    /// Run one request/reply round trip: acquire the gate, install a reply
    /// slot, invoke `send` to write the command, then wait for
    /// [`CommandSlot::fulfill`] or the timeout.
    pub async fn run<F, Fut>(&self, timeout: Duration, send: F) -> Result<R, AdapterError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<(), AdapterError>>,
    {
        let _permit = self.gate.lock().await;
        let (tx, rx) = oneshot::channel();
        *self.pending.lock() = Some(tx);

        if let Err(e) = send().await {
            self.pending.lock().take();
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(AdapterError::Terminated),
            Err(_) => {
                self.pending.lock().take();
                Err(AdapterError::Timeout)
            }
        }
    }

    /// Called by the backend's line-reader task once it recognizes a
    /// terminal reply line. A no-op if nothing is waiting (e.g. an
    /// unsolicited async notification arrived).
    pub fn fulfill(&self, reply: R) {
        if let Some(tx) = self.pending.lock().take() {
            let _ = tx.send(reply);
        }
    }
}

#[cfg(test)]
#[path = "inflight_tests.rs"]
mod tests;
