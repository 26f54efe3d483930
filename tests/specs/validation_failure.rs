//! (f) Validation failure — spec.md §8 scenario (f).

use crate::prelude::*;
use serde_json::json;

#[tokio::test]
async fn invalid_filename_is_rejected_with_400() {
    let daemon = Daemon::start();

    let req = json!({
        "lang": "dynamic",
        "entry": "../etc/passwd",
        "args": [],
        "files": [{"name": "../etc/passwd", "content": "x"}],
        "mode": "run",
        "breakpoints": [],
    });

    let (status, body) = daemon.create(req).await.expect_err("invalid filename should be rejected");
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap_or_default().contains("invalid filename"), "got: {body}");
}

#[tokio::test]
async fn oversized_file_is_rejected_with_400() {
    let daemon = Daemon::start();

    let req = json!({
        "lang": "dynamic",
        "entry": "m.py",
        "args": [],
        "files": [{"name": "m.py", "content": "x".repeat(300_000)}],
        "mode": "run",
        "breakpoints": [],
    });

    let (status, body) = daemon.create(req).await.expect_err("oversized file should be rejected");
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap_or_default().contains("file too large"), "got: {body}");
}
