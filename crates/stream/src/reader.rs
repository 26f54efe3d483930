// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chunked async reader loop driving a [`SentinelMultiplexer`] (§4.2).

use crate::sentinel::{Frame, SentinelMultiplexer};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

/// Chunks no larger than this are read per `read()` call, per §4.2.
pub const CHUNK_SIZE: usize = 1024;

/// Read `reader` to EOF in ≤ [`CHUNK_SIZE`]-byte chunks, scanning each chunk
/// for the prompt sentinel and forwarding the resulting frames on `tx`.
///
/// Returns once the reader hits EOF or errors; the caller's `select!` loop
/// (§4.6) races this against child-exit and client messages, so an error
/// here is logged and treated the same as EOF — the stream is simply done.
pub async fn pump_stdout<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<Frame>) {
    let mut mux = SentinelMultiplexer::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for frame in mux.feed(&buf[..n]) {
                    if tx.send(frame).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "stdout read failed, treating as eof");
                break;
            }
        }
    }
    if let Some(frame) = mux.flush() {
        let _ = tx.send(frame).await;
    }
}

/// Read `reader` to EOF in ≤ [`CHUNK_SIZE`]-byte chunks, forwarding raw
/// decoded text without sentinel scanning (§4.2 "stderr is never sentinel
/// parsed").
pub async fn pump_stderr<R: AsyncRead + Unpin>(mut reader: R, tx: mpsc::Sender<String>) {
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                let text = crate::sentinel::decode_stderr_chunk(&buf[..n]);
                if tx.send(text).await.is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "stderr read failed, treating as eof");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
