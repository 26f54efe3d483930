use super::*;
use std::path::PathBuf;
use xrun_sandbox::ResourceLimits;

#[tokio::test]
async fn spawns_program_with_args_cwd_and_env() {
    let spec = SpawnSpec::new("echo", vec!["hi".to_string()], PathBuf::from("."), ResourceLimits::default())
        .with_env("FOO", "bar");
    let mut cmd = command_from_spec(&spec);
    let output = cmd.output().await.unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hi");
}
