// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router assembly: wires the session-create endpoint and the duplex WS
//! stream behind shared [`AppState`].

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::routes::{create_session, stream_session};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}/stream", get(stream_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
