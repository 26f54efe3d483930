// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /sessions/:id/stream` (§6 "Duplex stream"): upgrades to a
//! WebSocket and bridges it to the session's run/debug supervisor loop.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use xrun_core::{Mode, SessionId};
use xrun_wire::{ClientFrame, ServerFrame};

use crate::debug_adapter;
use crate::state::AppState;

pub async fn stream_session(State(state): State<AppState>, Path(id): Path<String>, ws: WebSocketUpgrade) -> Response {
    let session_id = SessionId::from_raw(id);
    match state.registry.attach(&session_id) {
        Ok(record) => {
            let watchdog = state.config.watchdog();
            ws.on_upgrade(move |socket| async move {
                drive_session(socket, record, watchdog).await;
                state.registry.remove(&session_id);
            })
        }
        Err(_) => (axum::http::StatusCode::NOT_FOUND, "invalid session_id").into_response(),
    }
}

async fn drive_session(socket: WebSocket, record: xrun_registry::SessionRecord, watchdog: std::time::Duration) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (client_tx, client_rx) = mpsc::channel::<ClientFrame>(64);
    let (out_tx, mut out_rx) = mpsc::channel::<ServerFrame>(256);

    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            let Ok(text) = serde_json::to_string(&frame) else { continue };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let reader_out_tx = out_tx.clone();
    let reader = tokio::spawn(async move {
        while let Some(msg) = ws_rx.next().await {
            // WS abnormal closure is treated the same as a clean close or
            // a client drop (§3 Supplemented features): stop forwarding
            // and let the sender side close, which the supervisor reads
            // as a disconnect.
            let Ok(Message::Text(text)) = msg else { break };
            match serde_json::from_str::<ClientFrame>(&text) {
                Ok(frame) => {
                    if client_tx.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed client frame");
                    let data = format!("malformed client frame: {e}");
                    if reader_out_tx.send(ServerFrame::Err { data }).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    let descriptor = &record.descriptor;
    match descriptor.mode {
        Mode::Run => {
            xrun_supervisor::run_session::run_with_watchdog(&record.sandbox, client_rx, out_tx, watchdog).await;
        }
        Mode::Debug => match debug_adapter::launch(&record).await {
            Ok(adapter) => {
                xrun_supervisor::debug_session::run_with_watchdog(
                    adapter,
                    record.sandbox.workdir_mount.clone(),
                    record.descriptor.initial_breakpoints.clone(),
                    client_rx,
                    out_tx,
                    watchdog,
                )
                .await;
            }
            Err(diagnostics) => {
                let _ = out_tx.send(ServerFrame::fatal_err(diagnostics)).await;
                let _ = out_tx.send(ServerFrame::Exit { code: -1, reason: Some("compile failed".to_string()) }).await;
            }
        },
    }

    drop(out_tx);
    reader.abort();
    let _ = writer.await;
}
