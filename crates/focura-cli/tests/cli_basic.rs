//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own config directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focura"))
        .args(args)
        .env("FOCURA_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("stdout line is not JSON"))
        .collect()
}

#[test]
fn test_config_get_default() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.session_min"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_set_persists() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "timer.break_min", "10"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.break_min"]);
    assert_eq!(stdout.trim(), "10");

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.break_min"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_set_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "set", "timer.session_min", "200"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_list_is_toml() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[timer]"));
    assert!(stdout.contains("channel = \"my-channel\""));
}

#[test]
fn test_timer_status() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "status"]);
    assert_eq!(code, 0);
    let snapshot: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["type"], "state_snapshot");
    assert_eq!(snapshot["clock"], "25:00");
    assert_eq!(snapshot["is_running"], false);
}

#[test]
fn test_timer_simulate_full_focus_session() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "simulate", "--start", "--ticks", "1500"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "timer_started");
    assert_eq!(lines[1]["type"], "phase_completed");
    assert_eq!(lines[1]["to"], "break");

    let snapshot = &lines[2];
    assert_eq!(snapshot["mode"], "break");
    assert_eq!(snapshot["clock"], "05:00");
    assert_eq!(snapshot["completed_sessions"], 1);
    // Break auto-starts by default.
    assert_eq!(snapshot["is_running"], true);
}

#[test]
fn test_timer_simulate_without_start_is_idle() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["timer", "simulate", "--ticks", "90"]);
    assert_eq!(code, 0);
    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["remaining_secs"], 1500);
}

#[test]
fn test_timer_run_fast_single_cycle() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "timer.session_min", "5"]);
    run_cli(dir.path(), &["config", "set", "timer.break_min", "1"]);

    let (code, stdout, _) = run_cli(
        dir.path(),
        &["timer", "run", "--speed", "1000", "--cycles", "1"],
    );
    assert_eq!(code, 0);
    let lines = json_lines(&stdout);
    assert_eq!(lines.first().unwrap()["type"], "timer_started");
    assert!(lines
        .iter()
        .any(|l| l["type"] == "phase_completed" && l["from"] == "focus"));
    let snapshot = &lines[lines.len() - 2];
    assert_eq!(snapshot["type"], "state_snapshot");

    let stats = lines.last().unwrap();
    assert_eq!(stats["duration"], 300_000);
    assert_eq!(stats["focusPercentage"], 100);
}

#[test]
fn test_timer_run_rejects_bad_speed() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["timer", "run", "--speed", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--speed"));
}

#[test]
fn test_relay_demo_prints_toasts() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["relay", "demo"]);
    assert_eq!(code, 0);

    let lines = json_lines(&stdout);
    assert_eq!(lines.len(), 3);
    // The two streams are handled by separate tasks, so toast order varies.
    let titles: Vec<&str> = lines[..2].iter().filter_map(|l| l["title"].as_str()).collect();
    assert!(titles.contains(&"Hydration Reminder"));
    assert!(titles.contains(&"Posture Check"));
    assert_eq!(lines[2]["postureIssues"], 1);
}

#[test]
fn test_detect_missing_image_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.jpg");
    let (code, _, stderr) = run_cli(
        dir.path(),
        &["detect", "posture", "--image", missing.to_str().unwrap()],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot read image"));
}
