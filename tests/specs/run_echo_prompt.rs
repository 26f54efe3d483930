//! (a) Run, echo with prompt — spec.md §8 scenario (a).

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn run_echoes_output_and_resumes_after_stdin() {
    let daemon = Daemon::start();

    let req = dynamic_session("m.py", "print(\"hi\"); name=input(\"? \"); print(\"hello \" + name)");
    let created = daemon.create(req).await.expect("session should be created");
    let ws_url = created["ws_url"].as_str().expect("ws_url should be a string").to_string();

    let mut session = daemon.connect(&ws_url).await;

    // Status may pass through starting/exec before running; only running is
    // asserted on, the rest are allowed pass-through.
    loop {
        let frame = session.recv().await;
        assert_eq!(frame["type"], json!("status"), "expected only status frames before the first output, got {frame}");
        if frame["phase"] == json!("running") {
            break;
        }
    }

    let hi = session.recv_until("out", &["status"]).await;
    assert_eq!(hi["data"], json!("hi\n"));

    let prompt = session.recv_until("out", &[]).await;
    assert_eq!(prompt["data"], json!("? "));

    let awaiting = session.recv_until("awaiting_input", &[]).await;
    assert_eq!(awaiting["value"], json!(true));

    session.send_in("ada\n").await;

    let resumed = session.recv_until("awaiting_input", &[]).await;
    assert_eq!(resumed["value"], json!(false));

    let greeting = session.recv_until("out", &[]).await;
    assert_eq!(greeting["data"], json!("hello ada\n"));

    let exit = session.recv_until("exit", &[]).await;
    assert_eq!(exit["code"], json!(0));
}
