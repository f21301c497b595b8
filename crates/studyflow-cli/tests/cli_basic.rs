//! Basic CLI E2E tests.
//!
//! Each test runs the compiled binary against its own temporary data
//! directory and checks the JSON it prints.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

struct Cli {
    dir: TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_studyflow"))
            .args(args)
            .env("STUDYFLOW_DATA_DIR", self.dir.path())
            .env_remove("STUDYFLOW_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    fn json(&self, args: &[&str]) -> Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "command {args:?} failed: {stderr}");
        serde_json::from_str(&stdout).expect("Failed to parse JSON output")
    }
}

#[test]
fn test_task_add_and_list() {
    let cli = Cli::new();
    let first = cli.json(&["task", "add", "Read chapter 2", "--minutes", "30"]);
    assert_eq!(first["name"], "Read chapter 2");
    assert_eq!(first["duration_minutes"], 30);
    assert_eq!(first["kind"]["type"], "work");

    cli.json(&["task", "add", "Problem set"]);
    let tasks = cli.json(&["task", "list"]);
    let names: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Read chapter 2", "Short Break", "Problem set"]);
}

#[test]
fn test_task_add_ignores_blank_name() {
    let cli = Cli::new();
    let added = cli.json(&["task", "add", "   "]);
    assert_eq!(added, Value::Null);
    assert_eq!(cli.json(&["task", "list"]), Value::Array(vec![]));
}

#[test]
fn test_task_complete_and_uncomplete() {
    let cli = Cli::new();
    let task = cli.json(&["task", "add", "Essay outline"]);
    let id = task["id"].as_u64().unwrap().to_string();

    let done = cli.json(&["task", "complete", &id]);
    assert_eq!(done["completed"], true);
    // completing again changes nothing
    let again = cli.json(&["task", "complete", &id]);
    assert_eq!(again, done);

    let undone = cli.json(&["task", "uncomplete", &id]);
    assert_eq!(undone["completed"], false);
}

#[test]
fn test_task_unknown_ids_are_noops() {
    let cli = Cli::new();
    cli.json(&["task", "add", "Flashcards"]);
    assert_eq!(cli.json(&["task", "delete", "42"]), Value::Null);
    assert_eq!(cli.json(&["task", "complete", "42"]), Value::Null);
    assert_eq!(cli.json(&["task", "uncomplete", "42"]), Value::Null);
    let highlighted = cli.json(&["task", "highlight", "42"]);
    assert_eq!(highlighted["current"], Value::Null);
    assert_eq!(cli.json(&["task", "list"]).as_array().unwrap().len(), 1);
}

#[test]
fn test_plan_generate_is_reproducible() {
    let cli = Cli::new();
    let args = [
        "plan",
        "generate",
        "review calculus chapter 5",
        "--length",
        "short",
        "--seed",
        "3",
    ];
    let a = cli.json(&args);
    let b = cli.json(&args);
    assert_eq!(a, b);
    assert_eq!(a["category"], "review");
    assert_eq!(a["subject"], "math");
    assert_eq!(a["tasks"].as_array().unwrap().len(), 3);
}

#[test]
fn test_plan_apply_fills_the_queue() {
    let cli = Cli::new();
    cli.json(&["task", "add", "Old task"]);
    let applied = cli.json(&[
        "plan", "generate", "write history essay", "--length", "medium", "--apply", "--replace",
    ]);
    assert_eq!(applied["task_ids"].as_array().unwrap().len(), 7);

    let tasks = cli.json(&["task", "list"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 7);
    assert!(tasks.iter().all(|t| t["name"] != "Old task"));
    assert_eq!(tasks[0]["phase"], "warmup");
}

#[test]
fn test_plan_rejects_short_goal() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["plan", "generate", "x"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("at least 2 characters"));
}

#[test]
fn test_timer_status_and_mode() {
    let cli = Cli::new();
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["mode"], "work");
    assert_eq!(status["state"], "idle");
    assert_eq!(status["remaining_secs"], 1500);

    let status = cli.json(&["timer", "mode", "short_break"]);
    assert_eq!(status["mode"], "short_break");
    assert_eq!(status["remaining_secs"], 300);

    // mode survives between invocations
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["mode"], "short_break");
}

#[test]
fn test_timer_skip_when_idle_is_harmless() {
    let cli = Cli::new();
    let status = cli.json(&["timer", "skip"]);
    assert_eq!(status["state"], "idle");
    let stats = cli.json(&["stats", "show"]);
    assert_eq!(stats["stats"]["total_sessions"], 0);
}

#[test]
fn test_durations_are_clamped() {
    let cli = Cli::new();
    let applied = cli.json(&["durations", "set", "--work", "500", "--short-break", "0"]);
    assert_eq!(applied["work"], 90);
    assert_eq!(applied["short_break"], 1);
    assert_eq!(applied["long_break"], 15);

    let shown = cli.json(&["durations", "show"]);
    assert_eq!(shown["durations"]["work"], 90);
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["remaining_secs"], 90 * 60);
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "get", "auto_advance"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "false");

    let (_, _, code) = cli.run(&["config", "set", "limits.work.max", "120"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "limits.work.max"]);
    assert_eq!(stdout.trim(), "120");

    let (_, stderr, code) = cli.run(&["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_stats_history_empty() {
    let cli = Cli::new();
    let history = cli.json(&["stats", "history"]);
    assert_eq!(history, Value::Array(vec![]));
}
