//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the data directory and return
/// (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusseal"))
        .env("FOCUSSEAL_HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

const ONE_SESSION: &str = r#"[{
    "id": "imported-1",
    "startTime": 1704099600000,
    "endTime": 1704101100000,
    "durationMinutes": 25,
    "preset": "standard",
    "completed": true
}]"#;

#[test]
fn test_timer_status() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert_eq!(code, 0, "Timer status failed");
    let snap = parse_json(&stdout);
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["preset"], "standard");
    assert_eq!(snap["display"], "25:00");
}

#[test]
fn test_timer_status_reports_next_run_and_last_session() {
    let home = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(home.path(), &["timer", "status"]);
    assert!(parse_json(&stdout)["lastSession"].is_null());

    let file = home.path().join("sessions.json");
    std::fs::write(&file, ONE_SESSION).unwrap();
    let (code, _, _) = run_cli(home.path(), &["history", "import", file.to_str().unwrap()]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["timer", "status", "--preset", "deep"]);
    assert_eq!(code, 0, "Timer status failed");
    let status = parse_json(&stdout);
    assert_eq!(status["preset"], "deep");
    assert_eq!(status["nextRunMinutes"], 50);
    assert_eq!(status["breakMinutes"], 5);
    assert_eq!(status["display"], "50:00");
    assert_eq!(status["lastSession"]["id"], "imported-1");
}

#[test]
fn test_unusable_data_dir_reports_storage_error() {
    let home = tempfile::tempdir().unwrap();
    let blocker = home.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let (code, _, stderr) = run_cli(&blocker.join("nested"), &["history", "list"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Data directory unavailable"), "stderr: {stderr}");
}

#[test]
fn test_settings_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["settings", "set", "quickDuration", "12"]);
    assert_eq!(code, 0, "Settings set failed");

    let (code, stdout, _) = run_cli(home.path(), &["settings", "show"]);
    assert_eq!(code, 0, "Settings show failed");
    let settings = parse_json(&stdout);
    assert_eq!(settings["quickDuration"], 12);
    assert_eq!(settings["standardDuration"], 25);
}

#[test]
fn test_settings_patch_and_rejects() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        home.path(),
        &["settings", "patch", r#"{"autoStartBreak": false, "breakDuration": 7}"#],
    );
    assert_eq!(code, 0, "Settings patch failed");
    let settings = parse_json(&stdout);
    assert_eq!(settings["autoStartBreak"], false);
    assert_eq!(settings["breakDuration"], 7);

    let (code, _, stderr) = run_cli(home.path(), &["settings", "set", "volume", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(home.path(), &["settings", "set", "deepDuration", "0"]);
    assert_eq!(code, 1);
}

#[test]
fn test_history_import_export_clear() {
    let home = tempfile::tempdir().unwrap();
    let bad = home.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();
    let (code, _, _) = run_cli(home.path(), &["history", "import", bad.to_str().unwrap()]);
    assert_eq!(code, 1, "Garbage import should fail");

    let good = home.path().join("good.json");
    std::fs::write(&good, ONE_SESSION).unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["history", "import", good.to_str().unwrap()]);
    assert_eq!(code, 0, "History import failed");
    assert!(stdout.contains("imported 1 sessions"));

    let (code, stdout, _) = run_cli(home.path(), &["history", "list", "--json"]);
    assert_eq!(code, 0);
    let sessions = parse_json(&stdout);
    assert_eq!(sessions[0]["id"], "imported-1");

    let out_dir = home.path().join("exports");
    let (code, stdout, _) = run_cli(
        home.path(),
        &["history", "export", "--dir", out_dir.to_str().unwrap()],
    );
    assert_eq!(code, 0, "History export failed");
    let exported = std::fs::read_to_string(stdout.trim()).unwrap();
    assert!(exported.contains("imported-1"));
    assert!(stdout.contains("focusseal-sessions-"));

    let (code, stdout, _) = run_cli(home.path(), &["history", "stats"]);
    assert_eq!(code, 0);
    assert_eq!(parse_json(&stdout)["completedSessions"], 1);

    let (code, _, _) = run_cli(home.path(), &["history", "clear"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["history", "list", "--json"]);
    assert_eq!(parse_json(&stdout), serde_json::json!([]));
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "storage.database"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "focusseal.db");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "logging.filter", "info"]);
    assert_eq!(code, 0, "Config set failed");
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "logging.filter"]);
    assert_eq!(stdout.trim(), "info");

    let (code, _, _) = run_cli(home.path(), &["config", "get", "ui.dark_mode"]);
    assert_eq!(code, 1);

    let (code, stdout, _) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
}
