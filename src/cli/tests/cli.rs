use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn psdelta() -> Command {
    let mut cmd = Command::cargo_bin("psdelta").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> String {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path.to_string_lossy().to_string()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn no_subcommand_exits_with_one() {
    psdelta()
        .assert()
        .code(1)
        .stderr(contains("No command provided"));
}

#[test]
fn version() {
    psdelta()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn help_lists_examples() {
    psdelta()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Examples:"))
        .stdout(contains("compare"));
}

#[test]
fn compare_writes_delta() {
    let dir = TempDir::new().unwrap();
    let before = write_json(
        &dir,
        "before.json",
        &json!({
            "processes": [
                {"name": "notepad.exe", "pid": 10, "exe": "C:\\Windows\\notepad.exe",
                 "cmdline": ["notepad.exe", "a.txt"], "create_time": 100.2}
            ],
            "services": [
                {"service_name": "Spooler", "display_name": "Print Spooler", "status": "Running"}
            ]
        }),
    );
    let after = write_json(
        &dir,
        "after.json",
        &json!({
            "processes": [
                {"name": "notepad.exe", "pid": 11, "exe": "C:\\Windows\\notepad.exe",
                 "cmdline": ["notepad.exe", "b.txt"], "create_time": 100.9}
            ],
            "services": [
                {"service_name": "Spooler", "display_name": "Print Spooler", "status": "Stopped"},
                {"service_name": "BITS", "display_name": "Background Intelligent Transfer Service", "status": "Running"}
            ]
        }),
    );
    let output = dir.path().join("out").join("delta.json");

    psdelta()
        .args(["compare", "-s1", &before, "-s2", &after, "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("delta with 1 started, 1 terminated, 2 services changed"));

    let delta = read_json(&output);
    assert_eq!(delta["processes_terminated"][0]["cmdline"][1], "a.txt");
    assert_eq!(delta["processes_started"][0]["cmdline"][1], "b.txt");
    assert_eq!(delta["services"][0]["service_name"], "Spooler");
    assert_eq!(delta["services"][0]["status_after"], "Stopped");
    assert_eq!(delta["services"][1]["service_name"], "BITS");
    assert_eq!(delta["services"][1]["status_before"], "Not Present");
}

#[test]
fn compare_applies_filters() {
    let dir = TempDir::new().unwrap();
    let before = write_json(&dir, "before.json", &json!({"processes": [], "services": []}));
    let after = write_json(
        &dir,
        "after.json",
        &json!({
            "processes": [
                {"name": "chrome.exe", "pid": 1, "exe": "C:\\chrome.exe", "cmdline": ["chrome.exe"], "create_time": 1.0},
                {"name": "svchost.exe", "pid": 2, "exe": "C:\\svchost.exe", "cmdline": ["svchost.exe"], "create_time": 1.0},
                {"name": "code.exe", "pid": 3, "exe": "C:\\code.exe", "cmdline": ["code.exe"], "create_time": 1.0}
            ],
            "services": []
        }),
    );
    let output = dir.path().join("delta.json");

    psdelta()
        .args(["compare", "--snapshot1", &before, "--snapshot2", &after, "-o"])
        .arg(&output)
        .args(["--exclude", "code*"])
        .assert()
        .success();

    let delta = read_json(&output);
    let started = delta["processes_started"].as_array().unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0]["name"], "chrome.exe");
}

#[test]
fn malformed_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let good = write_json(&dir, "good.json", &json!({"processes": [], "services": []}));
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();

    psdelta()
        .args(["compare", "-s1", &good, "-s2"])
        .arg(&bad)
        .args(["-o", "unused.json"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(contains("Failed to parse"));

    assert!(!dir.path().join("unused.json").exists());
}

#[test]
fn missing_input_fails() {
    psdelta()
        .args(["load", "-i", "/definitely/not/here.json", "-a", "close"])
        .assert()
        .failure()
        .stderr(contains("Failed to open"));
}

#[test]
fn load_rejects_unknown_action() {
    psdelta()
        .args(["load", "-i", "delta.json", "-a", "explode"])
        .assert()
        .failure();
}

#[test]
fn load_of_empty_delta_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        &dir,
        "delta.json",
        &json!({"processes_terminated": [], "processes_started": [], "services": []}),
    );

    psdelta()
        .args(["load", "-i", &input, "-a", "close", "run", "restart"])
        .assert()
        .success()
        .stdout(contains("finished: 0 completed"));
}

#[test]
fn save_writes_snapshot_with_current_processes() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("snapshot.json");
    let log = dir.path().join("psdelta.log");

    psdelta()
        .arg("save")
        .arg("-o")
        .arg(&output)
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success()
        .stdout(contains("snapshot of"));

    let snapshot = read_json(&output);
    assert!(!snapshot["processes"].as_array().unwrap().is_empty());
    assert!(snapshot["services"].is_array());
    assert!(log.exists());
}
