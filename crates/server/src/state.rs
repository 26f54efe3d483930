// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared application state handed to every axum handler.

use std::sync::Arc;

use xrun_registry::SessionRegistry;
use xrun_sandbox::SandboxLauncher;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<SessionRegistry>,
    pub launcher: Arc<SandboxLauncher>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let launcher = SandboxLauncher::new(config.sandbox_exe.clone());
        Self { config: Arc::new(config), registry: Arc::new(SessionRegistry::new()), launcher: Arc::new(launcher) }
    }
}
