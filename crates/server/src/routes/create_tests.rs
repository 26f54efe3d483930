use super::*;
use axum::extract::State;
use axum::Json;
use xrun_core::{Language, Mode};
use xrun_wire::FileEntry;

fn state() -> AppState {
    AppState::new(crate::config::Config {
        bind: "127.0.0.1:0".parse().unwrap(),
        public_ws_base: Some("ws://example.test".to_string()),
        sandbox_exe: None,
        watchdog_secs: 60,
    })
}

fn request() -> CreateSessionRequest {
    CreateSessionRequest {
        lang: Language::Dynamic,
        entry: "m.py".to_string(),
        args: Vec::new(),
        files: vec![FileEntry { name: "m.py".to_string(), content: "print('hi')".to_string() }],
        mode: Mode::Run,
        breakpoints: Vec::new(),
    }
}

#[tokio::test]
async fn accepts_a_valid_request_and_returns_a_ws_url() {
    let response = create_session(State(state()), Json(request())).await.unwrap();
    assert!(response.0.ws_url.starts_with("ws://example.test/sessions/"));
    assert!(response.0.ws_url.ends_with("/stream"));
}

#[tokio::test]
async fn rejects_an_invalid_filename_without_materializing_a_workdir() {
    let mut req = request();
    req.files = vec![FileEntry { name: "../etc/passwd".to_string(), content: "x".to_string() }];
    req.entry = "../etc/passwd".to_string();

    let (status, Json(err)) = create_session(State(state()), Json(req)).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err.detail.contains("invalid filename"));
}

#[tokio::test]
async fn rejects_an_oversized_file() {
    let mut req = request();
    req.files = vec![FileEntry { name: "m.py".to_string(), content: "x".repeat(300_000) }];

    let (status, Json(err)) = create_session(State(state()), Json(req)).await.unwrap_err();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(err.detail.contains("file too large"));
}
