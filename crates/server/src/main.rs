// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! xrund — multi-language code execution and debugging daemon.

use clap::Parser;

use xrun_server::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    xrun_server::logging::init();

    let bind = config.bind;
    let state = AppState::new(config);
    let app = router(state);

    tracing::info!(%bind, "xrund listening");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
