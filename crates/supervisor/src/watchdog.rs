// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded wall-clock execution limit (§4.3, §4.6: "default 60 s").

use std::time::Duration;

pub const DEFAULT_WATCHDOG: Duration = Duration::from_secs(60);
