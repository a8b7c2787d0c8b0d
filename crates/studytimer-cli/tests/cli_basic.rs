//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Each test
//! points HOME at a scratch directory so the real config is untouched.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command with `stdin` piped in and return (stdout, stderr, code).
fn run_cli_with_input(home: &std::path::Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "studytimer-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("STUDYTIMER_ENV")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(home: &std::path::Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(home, args, "")
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

#[test]
fn test_format() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["format", "309"]);
    assert_eq!(code, 0, "format failed");
    assert_eq!(stdout.trim(), "5:09");

    let (stdout, _, _) = run_cli(home.path(), &["format", "3600"]);
    assert_eq!(stdout.trim(), "1:00:00");
}

#[test]
fn test_presets_list() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["presets"]);
    assert_eq!(code, 0, "presets failed");
    assert!(stdout.contains("Pomodoro"));
    assert!(stdout.contains("25:00"));
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "sound.enabled", "false"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "sound.enabled"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "sound.volume"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_run_counts_down_to_completion() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["config", "set", "notifications.permission", "granted"]);

    let (stdout, _, code) = run_cli(home.path(), &["run", "--seconds", "2", "--start", "--json"]);
    assert_eq!(code, 0, "run failed");

    let events = json_lines(&stdout);
    let types: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    // The notification goes out while the completion is being handled,
    // before the event itself is printed.
    assert_eq!(
        types,
        vec!["Configured", "Started", "Ticked", "Notification", "Completed"]
    );
    assert_eq!(events[0]["total_secs"], 2);
}

#[test]
fn test_run_start_without_time_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_with_input(home.path(), &["run", "--json"], "start\nquit\n");
    assert_eq!(code, 0, "run failed");

    let types: Vec<String> = json_lines(&stdout)
        .iter()
        .filter_map(|e| e["type"].as_str().map(str::to_string))
        .collect();
    assert!(types.contains(&"StartRejected".to_string()));
    assert!(!types.contains(&"Started".to_string()));
}

#[test]
fn test_unknown_preset_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["run", "--preset", "nap", "--json"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no preset named nap"));
}
