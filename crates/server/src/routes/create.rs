// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `POST /sessions` (§6 "Session create").

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use xrun_core::SessionDescriptor;
use xrun_wire::{CreateSessionError, CreateSessionRequest, CreateSessionResponse};

use crate::state::AppState;

pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, (StatusCode, Json<CreateSessionError>)> {
    let files = req.files.into_iter().map(|f| (f.name, f.content)).collect();
    let breakpoints = req.breakpoints.into_iter().map(|b| (b.file, b.line)).collect();

    let descriptor = SessionDescriptor::new(req.lang, req.mode, req.entry, req.args, files, breakpoints)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(CreateSessionError::from(e))))?;

    let sandbox = state.launcher.prepare(&descriptor).await.map_err(|e| {
        tracing::error!(session_id = %descriptor.id, error = %e, "sandbox preparation failed");
        (StatusCode::BAD_REQUEST, Json(CreateSessionError { detail: e.to_string() }))
    })?;

    let span = tracing::info_span!("session", session_id = %descriptor.id);
    let _enter = span.enter();

    let id = state.registry.create(descriptor, sandbox);
    let ws_url = format!("{}/sessions/{id}/stream", state.config.ws_base());
    tracing::info!("session created");

    Ok(Json(CreateSessionResponse { session_id: id, ws_url }))
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
