use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn cli(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("bpmn-finder").expect("binary");
    cmd.current_dir(workdir).env_remove("BPMN_FINDER_ROOT");
    cmd
}

#[test]
fn request_can_come_from_stdin() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.bpmn"), "<definitions/>").unwrap();

    let output = cli(temp.path())
        .arg("command")
        .write_stdin(r#"{"action":"scan"}"#)
        .output()
        .expect("command run");

    assert!(output.status.success());
    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["data"]["documents"], serde_json::json!(["a.bpmn"]));
    assert_eq!(body["meta"]["api_version"], 1);
}

#[test]
fn request_can_come_from_file_and_pretty_print() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.bpmn"), "<definitions/>").unwrap();
    let request = temp.path().join("request.json");
    fs::write(&request, r#"{"action":"scan","payload":{"root":"."}}"#).unwrap();

    let output = cli(temp.path())
        .arg("command")
        .arg("--file")
        .arg(&request)
        .arg("--pretty")
        .output()
        .expect("command run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\n  \"status\": \"ok\""), "not pretty: {stdout}");
}

#[test]
fn empty_stdin_is_rejected() {
    let temp = tempdir().unwrap();
    let output = cli(temp.path())
        .arg("command")
        .write_stdin("")
        .output()
        .expect("command run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Command request is empty"));
}
