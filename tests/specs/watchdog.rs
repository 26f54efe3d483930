//! (d) Watchdog — spec.md §8 scenario (d). Uses a 1s watchdog override so
//! the test doesn't have to wait out the real 60s default.

use crate::prelude::*;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn infinite_loop_is_killed_by_the_watchdog() {
    let daemon = Daemon::start_with_watchdog_secs(1);

    let req = dynamic_session("loop.py", "while True:\n    pass\n");
    let created = daemon.create(req).await.expect("session should be created");
    let ws_url = created["ws_url"].as_str().expect("ws_url should be a string").to_string();

    let mut session = daemon.connect(&ws_url).await;

    let exit = session.recv_until("exit", &["status", "out", "err"]).await;
    assert!(exit["code"].is_i64(), "watchdog kill should produce a terminal exit code: {exit}");

    assert!(session.recv_timeout(Duration::from_millis(300)).await.is_none(), "no frames should follow the watchdog's terminal exit frame");
}
