//! End-to-end tests for the `bt` binary.
//!
//! Drives the full flow: onboard → log records → day view → edit → day view,
//! against a temporary database selected through `--config`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir};

fn bt_binary() -> &'static str {
    env!("CARGO_BIN_EXE_bt")
}

struct Env {
    home: TempDir,
    config: NamedTempFile,
}

impl Env {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        let db_path = home.path().join("data").join("bt.db");
        let mut config = NamedTempFile::new().unwrap();
        writeln!(config, r#"database_path = "{}""#, db_path.display()).unwrap();
        config.flush().unwrap();
        Self { home, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bt_binary())
            .env("HOME", self.home.path())
            .env("TZ", "UTC")
            .env_remove("BT_DATABASE_PATH")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config.path())
            .args(args)
            .output()
            .expect("failed to run bt")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "bt {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn db_path(&self) -> std::path::PathBuf {
        self.home.path().join("data").join("bt.db")
    }
}

fn logged_id(output: &str) -> String {
    output
        .split_whitespace()
        .last()
        .expect("output names the new record")
        .to_string()
}

fn assert_exists(path: &Path) {
    assert!(path.exists(), "{} should exist", path.display());
}

#[test]
fn test_today_before_onboarding_shows_welcome() {
    let env = Env::new();
    let stdout = env.ok(&["today"]);
    assert!(stdout.contains("Welcome to BabyTracker!"));
    assert!(stdout.contains("bt onboard"));
    assert_exists(&env.db_path());
}

#[test]
fn test_full_day_flow() {
    let env = Env::new();
    let stdout = env.ok(&["onboard", "--name", "Ada"]);
    assert!(stdout.contains("Welcome, Ada!"));

    let awake_id = logged_id(&env.ok(&[
        "awake",
        "add",
        "--start",
        "2025-03-01T08:00:00Z",
        "--end",
        "2025-03-01T09:30:00Z",
    ]));
    env.ok(&[
        "feed",
        "add",
        "--time",
        "2025-03-01T10:00:00Z",
        "--amount",
        "120",
    ]);
    env.ok(&[
        "feed",
        "add",
        "--time",
        "2025-03-01T07:00:00Z",
        "--breastfeeding",
        "15",
    ]);

    let day = env.ok(&["today", "--date", "2025-03-01"]);
    assert!(day.contains("DAY VIEW: Saturday, Mar 1, 2025"), "{day}");
    assert!(day.contains("Baby: Ada"));
    assert!(day.contains("Total awake time:      1h 30m"));
    assert!(day.contains("Total feeding amount:  120 ml"));
    let timeline: Vec<&str> = day
        .lines()
        .skip_while(|line| *line != "────────")
        .skip(1)
        .collect();
    assert_eq!(
        timeline,
        vec![
            "10:00  feeding  120 ml",
            "08:00  awake    90 min",
            "07:00  feeding  15 min",
        ]
    );

    let json = env.ok(&["today", "--date", "2025-03-01", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(json["events"].as_array().unwrap().len(), 3);
    assert_eq!(json["total_awake_seconds"], 5400);

    env.ok(&["awake", "delete", &awake_id]);
    let day = env.ok(&["today", "--date", "2025-03-01"]);
    assert!(day.contains("Total awake time:      0h 0m"));
    assert!(!day.contains("awake    90 min"));
}

#[test]
fn test_breastfeeding_only_day() {
    let env = Env::new();
    env.ok(&["onboard", "--name", "Ada"]);
    env.ok(&[
        "feed",
        "add",
        "--time",
        "2025-03-02T07:00:00Z",
        "--breastfeeding",
        "15",
    ]);

    let day = env.ok(&["today", "--date", "2025-03-02"]);
    assert!(day.contains("Total awake time:      0h 0m"));
    assert!(day.contains("Total feeding amount:  15 min breastfeeding"));
}

#[test]
fn test_ongoing_session_can_be_ended() {
    let env = Env::new();
    env.ok(&["onboard", "--name", "Ada"]);
    let id = logged_id(&env.ok(&[
        "awake",
        "add",
        "--start",
        "2025-03-01T08:00:00Z",
        "--ongoing",
    ]));

    let list = env.ok(&["awake", "list"]);
    assert!(list.contains("Ongoing"));

    env.ok(&["awake", "end", &id, "--at", "2025-03-01T08:45:00Z"]);
    let list = env.ok(&["awake", "list"]);
    assert!(list.contains("45 minutes"), "{list}");

    let again = env.run(&["awake", "end", &id]);
    assert!(!again.status.success());
}

#[test]
fn test_invalid_input_is_reported() {
    let env = Env::new();
    env.ok(&["onboard", "--name", "Ada"]);

    let output = env.run(&[
        "awake",
        "add",
        "--start",
        "2025-03-01T10:00:00Z",
        "--end",
        "2025-03-01T09:00:00Z",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("before start time"), "{stderr}");

    let output = env.run(&["feed", "delete", "does-not-exist"]);
    assert!(!output.status.success());

    let output = env.run(&["onboard", "--name", "Bea"]);
    assert!(!output.status.success());
}

#[test]
fn test_settings_roundtrip_and_reset() {
    let env = Env::new();
    env.ok(&["onboard", "--name", "Ada"]);

    let stdout = env.ok(&[
        "settings",
        "set",
        "--reminders",
        "on",
        "--feeding-interval",
        "150",
    ]);
    assert!(stdout.contains("Feeding reminder:    every 2h 30m"));

    let stdout = env.ok(&["settings", "show"]);
    assert!(stdout.contains("Onboarding complete: yes"));
    assert!(stdout.contains("Reminders:           on"));

    env.ok(&["settings", "reset-onboarding"]);
    let stdout = env.ok(&["today"]);
    assert!(stdout.contains("Welcome to BabyTracker!"));

    let stdout = env.ok(&["settings", "show"]);
    assert!(stdout.contains("Reminders:           on"));
}

#[test]
fn test_baby_edit() {
    let env = Env::new();
    env.ok(&["onboard", "--name", "Ada", "--birth-date", "2024-06-01"]);
    env.ok(&["baby", "edit", "--name", "Ada Mae"]);

    let stdout = env.ok(&["baby", "show"]);
    assert!(stdout.starts_with("Ada Mae\n"));
    assert!(stdout.contains("Born June 1, 2024"));
}
