// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graceful-then-forceful child termination (§4.6 "Cleanup").
//!
//! Signals are sent via the `kill` binary rather than a libc/nix
//! dependency, the same way the daemon's own stop path signals a running
//! process by shelling out rather than linking a signals crate.

use std::time::Duration;

use tokio::process::Child;

/// Bounded interval the supervisor waits for a graceful exit before
/// escalating to `SIGKILL` (§4.6: "forceful kill if still alive after a
/// bounded interval" — the spec leaves the exact bound unspecified; see
/// DESIGN.md).
pub const GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Terminate `child`: SIGTERM, wait up to `grace`, then SIGKILL if it's
/// still alive. Returns the exit code, or -1 if it can never be determined.
pub async fn terminate(child: &mut Child, grace: Duration) -> i32 {
    if let Some(pid) = child.id() {
        send_signal("-TERM", pid);
    } else {
        let _ = child.start_kill();
    }

    let waited = tokio::time::timeout(grace, child.wait()).await;
    match waited {
        Ok(Ok(status)) => status.code().unwrap_or(-1),
        _ => {
            let _ = child.start_kill();
            child.wait().await.ok().and_then(|s| s.code()).unwrap_or(-1)
        }
    }
}

fn send_signal(signal: &str, pid: u32) {
    let _ = std::process::Command::new("kill")
        .args([signal, &pid.to_string()])
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status();
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
