//! (c) Stop mid-run — spec.md §8 scenario (c).

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn client_stop_kills_the_child_with_no_further_output() {
    let daemon = Daemon::start();

    let req = dynamic_session("loop.py", "while True:\n    pass\n");
    let created = daemon.create(req).await.expect("session should be created");
    let ws_url = created["ws_url"].as_str().expect("ws_url should be a string").to_string();

    let mut session = daemon.connect(&ws_url).await;

    loop {
        let frame = session.recv().await;
        assert_eq!(frame["type"], json!("status"), "expected only status frames before running, got {frame}");
        if frame["phase"] == json!("running") {
            break;
        }
    }

    session.send_stop().await;

    let stopping = session.recv_until("status", &["out", "err"]).await;
    assert_eq!(stopping["phase"], json!("stopping"));

    let exit = session.recv_until("exit", &[]).await;
    assert_ne!(exit["code"], json!(0), "a stopped child should not report a clean exit");

    assert!(session.recv_timeout(std::time::Duration::from_millis(200)).await.is_none(), "no frames should follow the terminal exit frame");
}
