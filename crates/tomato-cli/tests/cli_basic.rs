//! Basic CLI E2E tests.
//!
//! Each test runs the `tomato` binary against its own temporary data
//! directory and checks exit codes and JSON output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tomato"))
        .args(args)
        .env("TOMATO_DATA_DIR", data_dir)
        .env_remove("TOMATO_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (code, stdout, stderr)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_config_list_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let config = json(&stdout);
    assert_eq!(config["focus"]["default_minutes"], 25);
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "notifications.bell", "false"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "notifications.bell"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_set_reports_change_and_rejects_zero_poll() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "focus.default_minutes", "50"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "focus.default_minutes: 25 -> 50");

    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "timer.poll_interval_ms", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("poll_interval_ms"));
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.poll_interval_ms"]);
    assert_eq!(stdout.trim(), "250");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "ui.theme"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_timer_status_on_fresh_state() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot = json(&stdout);
    assert!(snapshot["current_session"].is_null());
    assert_eq!(snapshot["cycle"]["completed_focus_sessions"], 0);
}

#[test]
fn test_focus_skip_records_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli_with_input(
        dir.path(),
        &["timer", "focus", "--minutes", "1", "--goal", "write tests"],
        "s\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus complete"));

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "today"]);
    assert_eq!(code, 0);
    let stats = json(&stdout);
    assert_eq!(stats["focus_sessions_completed"], 1);
    assert_eq!(stats["total_focus_time_ms"], 60_000);
    assert_eq!(stats["session_records"][0]["goal"], "write tests");

    let (code, stdout, _) = run_cli(dir.path(), &["results", "--text", "done", "--rating", "4"]);
    assert_eq!(code, 0);
    let record = json(&stdout);
    assert_eq!(record["results"], "done");
    assert_eq!(record["rating"], 4);
}

#[test]
fn test_quit_pauses_and_resume_continues() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli_with_input(dir.path(), &["timer", "break"], "q\n");
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    let snapshot = json(&stdout);
    assert_eq!(snapshot["current_session"]["status"], "paused");
    assert_eq!(snapshot["current_session"]["session_type"], "short_break");

    let (code, stdout, _) = run_cli_with_input(dir.path(), &["timer", "resume"], "c\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Short Break cancelled"));

    let (_, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(json(&stdout)["current_session"]["status"], "cancelled");
}

#[test]
fn test_skip_without_paused_session_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "skip"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no paused session"));
}

#[test]
fn test_results_without_session_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["results", "--text", "nothing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no focus session"));

    let (code, _, _) = run_cli(dir.path(), &["results", "--rating", "9"]);
    assert_eq!(code, 1);
}

#[test]
fn test_activity_shows_in_stats_and_reset_clears() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["activity", "pairing on the parser"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(dir.path(), &["stats", "history"]);
    let history = json(&stdout);
    assert_eq!(
        history[0]["supplemental_activities"][0]["description"],
        "pairing on the parser"
    );

    let (code, _, _) = run_cli(dir.path(), &["reset"]);
    assert_eq!(code, 0);
    assert!(!dir.path().join("state.json").exists());

    let (_, stdout, _) = run_cli(dir.path(), &["stats", "history"]);
    assert_eq!(json(&stdout), serde_json::json!([]));
}
