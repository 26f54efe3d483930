//! (e) Ambiguous breakpoint path — spec.md §8 scenario (e): an absolute
//! `/work/...` path and the equivalent workdir-relative path must resolve
//! to the same breakpoint registry key.

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn absolute_and_relative_breakpoint_paths_resolve_to_the_same_key() {
    let daemon = Daemon::start();

    // A breakpoint configured at session-create time so the debuggee pauses
    // immediately on attach, before the test's add/remove commands are sent:
    // attaching auto-starts the debuggee (no explicit client "continue"), so
    // without something to pause on the program could finish before these
    // debug commands are processed.
    let req = dynamic_debug_session("m.py", "for i in range(20):\n    print(i)\n", vec![("m.py", 1)]);
    let created = daemon.create(req).await.expect("session should be created");
    let ws_url = created["ws_url"].as_str().expect("ws_url should be a string").to_string();

    let mut session = daemon.connect(&ws_url).await;

    let synced = session.recv_until("debug_event", &["status", "out", "err"]).await;
    assert_eq!(synced["event"], json!("breakpoints"));
    assert_eq!(synced["synced"], json!(true));
    let paused = session.recv_until("debug_event", &["status", "out", "err"]).await;
    assert_eq!(paused["event"], json!("paused"));

    session.send_debug_cmd(json!({"command": "add_breakpoint", "file": "/work/m.py", "line": 10})).await;
    let added = session.recv_until("debug_event", &["status", "out", "err"]).await;
    assert_eq!(added["event"], json!("breakpoints"));
    assert_eq!(added["synced"], json!(true));

    session.send_debug_cmd(json!({"command": "remove_breakpoint", "file": "m.py", "line": 10})).await;
    let removed = session.recv_until("debug_event", &["status", "out", "err"]).await;
    assert_eq!(removed["event"], json!("breakpoints"));
    assert_eq!(removed["synced"], json!(true));
}
