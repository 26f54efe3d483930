// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented child process plumbing shared by the gdb/MI, jdb and
//! delve backends (§4.4.1-3).

use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin};
use tokio::task::JoinHandle;

use crate::error::AdapterError;

/// Spawn `program` with `args` in `cwd`, piping stdin/stdout/stderr.
pub fn spawn_piped(program: &str, args: &[String], cwd: &Path) -> Result<Child, AdapterError> {
    tokio::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AdapterError::SpawnFailed(format!("{program}: {e}")))
}

/// Spawn a background task that reads `stdout` line by line and invokes
/// `on_line` for each one. The task exits when the child closes stdout.
pub fn spawn_line_reader<R, F>(stdout: R, on_line: F) -> JoinHandle<()>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    F: Fn(String) + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => on_line(line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "adapter stdout read failed");
                    break;
                }
            }
        }
    })
}

/// Write a single command line (newline-terminated) to the backend's stdin.
pub async fn write_line(stdin: &mut ChildStdin, line: &str) -> Result<(), AdapterError> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "line_io_tests.rs"]
mod tests;
