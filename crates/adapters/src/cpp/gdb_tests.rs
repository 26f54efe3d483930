use std::process::Stdio;

use super::*;

fn payload_from(pairs: &[(&str, MiValue)]) -> BTreeMap<String, MiValue> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// A real (but unused) stdin pipe: `dispatch_mi_line` takes one to pass
/// along to `handle_stopped`, even on paths that never write to it.
fn harmless_stdin() -> Arc<AsyncMutex<ChildStdin>> {
    let mut child = tokio::process::Command::new("cat").stdin(Stdio::piped()).stdout(Stdio::null()).spawn().expect("spawning cat for a test stdin handle");
    let stdin = child.stdin.take().expect("cat stdin should be piped");
    tokio::spawn(async move {
        let _ = child.wait().await;
    });
    Arc::new(AsyncMutex::new(stdin))
}

#[tokio::test]
async fn dispatch_fulfills_pending_command_on_result_record() {
    let slot = Arc::new(CommandSlot::new());
    let (tx, _rx) = mpsc::channel(8);
    let stdin = harmless_stdin();

    let slot2 = slot.clone();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        dispatch_mi_line(r#"^done,value="3""#, &stdin, &slot2, &tx);
    });

    let result = slot
        .run(std::time::Duration::from_secs(1), || async { Ok(()) })
        .await
        .unwrap();
    assert_eq!(result.class, "done");
    assert_eq!(result.payload["value"].as_str(), Some("3"));
}

#[tokio::test]
async fn dispatch_target_stream_emits_output_event() {
    let slot: Arc<CommandSlot<MiResult>> = Arc::new(CommandSlot::new());
    let (tx, mut rx) = mpsc::channel(8);
    let stdin = harmless_stdin();
    dispatch_mi_line(r#"@"hello from inferior\n""#, &stdin, &slot, &tx);
    let event = rx.try_recv().unwrap();
    assert_eq!(event, AdapterEvent::Output { data: "hello from inferior\n".to_string() });
}

#[test]
fn parse_stack_frames_reads_nested_frame_tuples() {
    let mut frame = BTreeMap::new();
    frame.insert("file".to_string(), MiValue::Str("main.cpp".to_string()));
    frame.insert("line".to_string(), MiValue::Str("5".to_string()));
    frame.insert("func".to_string(), MiValue::Str("main".to_string()));
    let mut frame_tuple = BTreeMap::new();
    frame_tuple.insert("frame".to_string(), MiValue::Tuple(frame));
    let payload = payload_from(&[("stack", MiValue::List(vec![MiValue::Tuple(frame_tuple)]))]);

    let frames = parse_stack_frames(&payload);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].file, "main.cpp");
    assert_eq!(frames[0].line, 5);
    assert_eq!(frames[0].function, "main");
}

#[test]
fn parse_locals_reads_name_value_pairs() {
    let mut i = BTreeMap::new();
    i.insert("name".to_string(), MiValue::Str("i".to_string()));
    i.insert("value".to_string(), MiValue::Str("1".to_string()));
    let payload = payload_from(&[("variables", MiValue::List(vec![MiValue::Tuple(i)]))]);

    let locals = parse_locals(&payload);
    assert_eq!(locals.get("i"), Some(&"1".to_string()));
}

#[tokio::test]
async fn handle_stopped_with_exited_reason_emits_terminated_without_querying() {
    let slot: Arc<CommandSlot<MiResult>> = Arc::new(CommandSlot::new());
    let (events_tx, mut events_rx) = mpsc::channel(8);
    let stdin = harmless_stdin();
    let payload = payload_from(&[
        ("reason", MiValue::Str("exited-normally".to_string())),
        ("exit-code", MiValue::Str("0x00".to_string())),
    ]);

    handle_stopped(payload, stdin, slot, events_tx);

    let event = events_rx.recv().await.unwrap();
    assert_eq!(event, AdapterEvent::Terminated { code: 0 });
}
