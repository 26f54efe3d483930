//! (b) C++ debug, hit breakpoint, inspect — spec.md §8 scenario (b).

use crate::prelude::*;
use serde_json::json;

const MAIN_CPP: &str = r#"#include <iostream>

int main() {
    for (int i = 1; i <= 3; ++i) {
        std::cout << i << std::endl;
    }
    return 0;
}
"#;

#[tokio::test]
async fn breakpoint_hit_then_inspect_then_run_to_completion() {
    let daemon = Daemon::start();

    let req = cpp_debug_session("main.cpp", MAIN_CPP, vec![("main.cpp", 5)]);
    let created = daemon.create(req).await.expect("session should be created");
    let ws_url = created["ws_url"].as_str().expect("ws_url should be a string").to_string();

    let mut session = daemon.connect(&ws_url).await;

    // `status:running` and the initial breakpoints-synced event come from
    // independent sources (the supervisor loop vs. the adapter's launch)
    // and carry no ordering guarantee relative to each other.
    let mut seen_running = false;
    let mut seen_synced = false;
    while !(seen_running && seen_synced) {
        let frame = session.recv().await;
        match frame["type"].as_str().unwrap_or_default() {
            "status" => {
                if frame["phase"] == json!("running") {
                    seen_running = true;
                }
            }
            "debug_event" if frame["event"] == json!("breakpoints") => {
                assert_eq!(frame["synced"], json!(true));
                seen_synced = true;
            }
            _ => panic!("unexpected frame before the first pause: {frame}"),
        }
    }

    let paused = session.recv_until("debug_event", &[]).await;
    assert_eq!(paused["event"], json!("paused"));
    assert_eq!(paused["line"], json!(5));
    assert!(paused["stack"].as_array().is_some_and(|s| !s.is_empty()), "stack should be non-empty: {paused}");

    session.send_debug_cmd(json!({"command": "evaluate", "expr": "i"})).await;
    let evaluated = session.recv_until("debug_event", &[]).await;
    assert_eq!(evaluated["event"], json!("evaluate_result"));
    assert_eq!(evaluated["expr"], json!("i"));
    assert_eq!(evaluated["value"], json!("1"));

    session.send_debug_cmd(json!({"command": "continue"})).await;
    let paused_again = session.recv_until("debug_event", &[]).await;
    assert_eq!(paused_again["event"], json!("paused"));
    assert_eq!(paused_again["line"], json!(5));

    session.send_debug_cmd(json!({"command": "continue"})).await;
    let paused_third = session.recv_until("debug_event", &[]).await;
    assert_eq!(paused_third["event"], json!("paused"));
    assert_eq!(paused_third["line"], json!(5));

    session.send_debug_cmd(json!({"command": "continue"})).await;
    let exit = session.recv_until("exit", &[]).await;
    assert_eq!(exit["code"], json!(0));
}
