//! Basic CLI E2E tests.
//!
//! Tests run the built binary with a throwaway data directory and check its
//! JSON output.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_energy-station"))
        .args(args)
        .env("ENERGY_STATION_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    stdout
}

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("Failed to parse JSON line"))
        .collect()
}

#[test]
fn test_catalog_list() {
    let dir = tempfile::tempdir().unwrap();
    let all: Value = serde_json::from_str(&run_cli_success(dir.path(), &["catalog", "list"])).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 16);

    let noise: Value = serde_json::from_str(&run_cli_success(
        dir.path(),
        &["catalog", "list", "--kind", "whitenoise"],
    ))
    .unwrap();
    let noise = noise.as_array().unwrap();
    assert_eq!(noise.len(), 6);
    assert!(noise.iter().all(|item| item["kind"] == "whitenoise"));
}

#[test]
fn test_catalog_route_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let route = run_cli_success(dir.path(), &["catalog", "route", "breathing_002"]);
    assert_eq!(route.trim(), "/p-breathing_detail?content_id=breathing_002");

    let shown: Value =
        serde_json::from_str(&run_cli_success(dir.path(), &["catalog", "show", "mindfulness_001"]))
            .unwrap();
    assert_eq!(shown["audio_secs"], 750);
}

#[test]
fn test_unknown_content_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["catalog", "show", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_recommend_low_energy() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["recommend", "--energy", "1", "--stress", "3", "--mood", "3"],
    );
    let picks: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(picks[0]["content_id"], "meditation_001");
    assert_eq!(picks[0]["route"], "/p-meditation_detail?content_id=meditation_001");

    let (_, _, code) = run_cli(
        dir.path(),
        &["recommend", "--energy", "9", "--stress", "3", "--mood", "3"],
    );
    assert_eq!(code, 1);
}

#[test]
fn test_simulate_breathing_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["simulate", "breathing_001", "--minutes", "5", "--ticks", "19"],
    );
    let events = json_lines(&out);
    assert_eq!(events[0]["type"], "SessionStarted");

    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["status"], "running");
    assert_eq!(snapshot["remaining_secs"], 281.0);
    assert_eq!(snapshot["phase"]["index"], 0);
}

#[test]
fn test_simulate_meditation_completes_once() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["simulate", "meditation_002", "--speed", "1.5", "--ticks", "1000"],
    );
    let events = json_lines(&out);
    let completions = events
        .iter()
        .filter(|e| e["type"] == "SessionCompleted")
        .count();
    assert_eq!(completions, 1);
    assert_eq!(events.last().unwrap()["status"], "completed");
}

#[test]
fn test_simulate_white_noise_timer() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["simulate", "rain", "--timer", "15", "--ticks", "900"],
    );
    let events = json_lines(&out);
    assert_eq!(events[0]["type"], "TimerSelected");
    assert_eq!(events[0]["remaining_secs"], 900);

    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["status"], "completed");
    assert_eq!(snapshot["timer_minutes"], 0);
}

#[test]
fn test_simulate_skip_steps_ten_seconds() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["simulate", "meditation_001", "--seek", "100", "--skip", "-3", "--ticks", "0"],
    );
    let events = json_lines(&out);
    let seeks = events.iter().filter(|e| e["type"] == "Seeked").count();
    assert_eq!(seeks, 4);

    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["elapsed_secs"], 70.0);
    assert_eq!(snapshot["clock_label"], "13:50");
}

#[test]
fn test_simulate_rejects_bad_speed() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &["simulate", "meditation_001", "--speed", "0", "--ticks", "1"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("speed"), "stderr: {stderr}");
}

#[test]
fn test_config_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "notifications.mood_record_reminder"]).trim(),
        "false"
    );

    run_cli_success(dir.path(), &["config", "set", "notifications.mood_record_reminder", "true"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "notifications.mood_record_reminder"]).trim(),
        "true"
    );
    assert!(dir.path().join("settings.toml").exists());

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "notifications.bogus", "true"]);
    assert_eq!(code, 1);

    run_cli_success(dir.path(), &["config", "reset"]);
    let list: Value = serde_json::from_str(&run_cli_success(dir.path(), &["config", "list"])).unwrap();
    assert_eq!(list["notifications"]["mood_record_reminder"], false);
    assert_eq!(list["practice"]["white_noise_volume"], 70);
}

#[test]
fn test_saved_breathing_length_applies_to_sessions() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "practice.breathing_minutes", "15"]);

    let out = run_cli_success(dir.path(), &["simulate", "breathing_003", "--ticks", "0"]);
    let snapshot = json_lines(&out).pop().unwrap();
    assert_eq!(snapshot["total_secs"], 900);
}

#[test]
fn test_out_of_range_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("settings.toml"),
        "[practice]\nbreathing_minutes = 7\n",
    )
    .unwrap();

    let out = run_cli_success(dir.path(), &["simulate", "breathing_001", "--ticks", "0"]);
    let snapshot = json_lines(&out).pop().unwrap();
    assert_eq!(snapshot["total_secs"], 600);
}

#[test]
fn test_play_stops_after_max_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["play", "rain", "--tick-ms", "10", "--max-ticks", "3"],
    );
    let events = json_lines(&out);
    assert_eq!(events[0]["type"], "SessionStarted");

    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["status"], "paused");
    assert_eq!(snapshot["elapsed_secs"], 3.0);
}
