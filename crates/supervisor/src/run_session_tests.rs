use super::*;
use std::path::PathBuf;
use xrun_sandbox::{MountMode, ResourceLimits};

fn prepared(program: &str, args: Vec<String>) -> PreparedSandbox {
    PreparedSandbox {
        workdir: tempfile::tempdir().unwrap(),
        workdir_mount: "/work".to_string(),
        mount_mode: MountMode::ReadWrite,
        compile_spec: None,
        run_spec: SpawnSpec::new(program, args, PathBuf::from("."), ResourceLimits::default()),
    }
}

#[tokio::test]
async fn echoes_output_and_exits_cleanly() {
    let prepared = prepared("echo", vec!["hello".to_string()]);
    let (_client_tx, client_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let code = run_with_watchdog(&prepared, client_rx, out_tx, Duration::from_secs(5)).await;
    assert_eq!(code, 0);

    let mut frames = Vec::new();
    while let Ok(frame) = out_rx.try_recv() {
        frames.push(frame);
    }
    assert!(frames.iter().any(|f| matches!(f, ServerFrame::Out { data } if data.contains("hello"))));
    assert!(matches!(frames.last(), Some(ServerFrame::Exit { code: 0, .. })));
}

#[tokio::test]
async fn stop_command_terminates_a_long_running_child() {
    let prepared = prepared("sleep", vec!["30".to_string()]);
    let (client_tx, client_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let handle = tokio::spawn(async move { run_with_watchdog(&prepared, client_rx, out_tx, Duration::from_secs(30)).await });

    client_tx.send(ClientFrame::Stop).await.unwrap();
    let code = handle.await.unwrap();
    assert_ne!(code, 0);

    let mut saw_stopping = false;
    while let Ok(frame) = out_rx.try_recv() {
        if matches!(frame, ServerFrame::Status { phase: StatusPhase::Stopping }) {
            saw_stopping = true;
        }
    }
    assert!(saw_stopping);
}

#[tokio::test]
async fn watchdog_terminates_a_child_that_outlives_the_deadline() {
    let prepared = prepared("sleep", vec!["30".to_string()]);
    let (_client_tx, client_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let code = run_with_watchdog(&prepared, client_rx, out_tx, Duration::from_millis(100)).await;
    assert_ne!(code, 0);

    let mut saw_exit = false;
    while let Ok(frame) = out_rx.try_recv() {
        if matches!(frame, ServerFrame::Exit { .. }) {
            saw_exit = true;
        }
    }
    assert!(saw_exit);
}

#[tokio::test]
async fn trailing_output_is_delivered_before_exit_on_child_exit() {
    let prepared = prepared("printf", vec!["a\\nb\\nc\\n".to_string()]);
    let (_client_tx, client_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    let code = run_with_watchdog(&prepared, client_rx, out_tx, Duration::from_secs(5)).await;
    assert_eq!(code, 0);

    let mut frames = Vec::new();
    while let Ok(frame) = out_rx.try_recv() {
        frames.push(frame);
    }
    let exit_idx = frames.iter().position(|f| matches!(f, ServerFrame::Exit { .. })).expect("an exit frame should be sent");
    let out_data: String = frames
        .iter()
        .filter_map(|f| match f {
            ServerFrame::Out { data } => Some(data.as_str()),
            _ => None,
        })
        .collect();
    assert!(out_data.contains('a') && out_data.contains('b') && out_data.contains('c'), "all output lines should survive: {out_data:?}");
    assert_eq!(exit_idx, frames.len() - 1, "exit must be the terminal frame, after every drained out/err frame: {frames:?}");
}

#[tokio::test]
async fn debug_cmd_is_rejected_in_run_mode() {
    let prepared = prepared("echo", vec!["hi".to_string()]);
    let (client_tx, client_rx) = mpsc::channel(8);
    let (out_tx, mut out_rx) = mpsc::channel(64);

    client_tx
        .send(ClientFrame::DebugCmd { command: xrun_wire::DebugCommand::Continue, file: None, line: None, expr: None })
        .await
        .unwrap();
    drop(client_tx);

    let _ = run_with_watchdog(&prepared, client_rx, out_tx, Duration::from_secs(5)).await;

    let mut saw_rejection = false;
    while let Ok(frame) = out_rx.try_recv() {
        if matches!(frame, ServerFrame::Err { data } if data.contains("debug commands")) {
            saw_rejection = true;
        }
    }
    assert!(saw_rejection);
}
