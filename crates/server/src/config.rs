// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `xrund` configuration: `clap` flags with env-var fallback, in the style
//! of `oj-daemon::env` — plain reads, no config-file layering.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "xrund", version, about = "Multi-language code execution and debugging daemon")]
pub struct Config {
    /// Address the HTTP/WS server binds to.
    #[arg(long, env = "XRUND_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Base URL (scheme+host+port) handed back in `ws_url` responses.
    /// Defaults to deriving `ws://<bind>` when unset.
    #[arg(long, env = "XRUND_PUBLIC_WS_BASE")]
    pub public_ws_base: Option<String>,

    /// Path to the external sandboxing helper every spawn is delegated
    /// through. Unset means run unsandboxed — fine for local dev, unsafe
    /// for anything else (§4.1).
    #[arg(long, env = "XRUND_SANDBOX_EXE")]
    pub sandbox_exe: Option<PathBuf>,

    /// Wall-clock execution limit per session, in seconds (§4.3, §4.6).
    #[arg(long, env = "XRUND_WATCHDOG_SECS", default_value_t = 60)]
    pub watchdog_secs: u64,
}

impl Config {
    pub fn watchdog(&self) -> Duration {
        Duration::from_secs(self.watchdog_secs)
    }

    /// The base URL to build `ws_url` responses from.
    pub fn ws_base(&self) -> String {
        self.public_ws_base.clone().unwrap_or_else(|| format!("ws://{}", self.bind))
    }
}
