use super::*;
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn spawn_piped_rejects_a_missing_program() {
    let err = spawn_piped("definitely-not-a-real-binary", &[], Path::new(".")).unwrap_err();
    assert!(matches!(err, AdapterError::SpawnFailed(_)));
}

#[tokio::test]
async fn line_reader_invokes_callback_per_line() {
    let data = b"one\ntwo\nthree\n".to_vec();
    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let lines2 = lines.clone();
    let handle = spawn_line_reader(std::io::Cursor::new(data), move |l| {
        lines2.lock().unwrap().push(l);
    });
    handle.await.unwrap();
    assert_eq!(*lines.lock().unwrap(), vec!["one", "two", "three"]);
}
