//! E2E tests for the `hd` binary against the built-in demo workspace.
//!
//! Covers: feed/summary JSON shape, persisted filters and theme, export
//! files, a seeded live run, and structured errors.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn prefs_path(dir: &Path) -> PathBuf {
    dir.join("prefs.json")
}

fn hd_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hd"));
    cmd.current_dir(dir);
    cmd.env("HUDDLE_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd.arg("--prefs").arg(prefs_path(dir));
    cmd
}

fn json_of(dir: &Path, args: &[&str]) -> Value {
    let output = hd_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("hd should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn feed_ids(dir: &Path) -> Vec<String> {
    json_of(dir, &["feed"])
        .as_array()
        .expect("feed is an array")
        .iter()
        .map(|row| row["id"].as_str().expect("id").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn feed_lists_demo_activity() {
    let dir = TempDir::new().expect("tempdir");
    let rows = json_of(dir.path(), &["feed"]);
    let rows = rows.as_array().expect("array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["user"], "Alice");
    assert_eq!(rows[1]["mentions"][0], "Alice");
    assert!(rows.iter().all(|row| row["project"] == "Docs"));
}

#[test]
fn feed_one_off_type_does_not_persist() {
    let dir = TempDir::new().expect("tempdir");
    let rows = json_of(dir.path(), &["feed", "--type", "upload"]);
    assert_eq!(rows.as_array().expect("array").len(), 1);
    assert_eq!(feed_ids(dir.path()).len(), 3);
}

#[test]
fn summary_reports_every_type() {
    let dir = TempDir::new().expect("tempdir");
    let report = json_of(dir.path(), &["summary"]);
    assert_eq!(report["total"], 3);
    assert_eq!(report["filtered"], false);
    let types = report["types"].as_array().expect("types");
    assert_eq!(types.len(), 4);
    assert_eq!(types[0]["type"], "edit");
    assert_eq!(types[2]["count"], 0);
    assert_eq!(types[2]["bar"], 16.0);
}

#[test]
fn outline_jump_unknown_section_fails() {
    let dir = TempDir::new().expect("tempdir");
    hd_cmd(dir.path())
        .args(["outline", "--jump", "section-missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("section-missing"));

    let report = json_of(dir.path(), &["outline", "--jump", "section-design"]);
    assert_eq!(report["jumped"]["section"]["label"], "Design Mockup");
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[test]
fn filter_toggles_persist_between_runs() {
    let dir = TempDir::new().expect("tempdir");

    let report = json_of(dir.path(), &["filter", "user", "u2"]);
    assert_eq!(report["visible"], 1);
    assert_eq!(report["active"], true);
    assert_eq!(feed_ids(dir.path()), ["a2"]);

    json_of(dir.path(), &["filter", "user", "u2"]);
    assert_eq!(feed_ids(dir.path()).len(), 3);

    json_of(dir.path(), &["filter", "type", "upload"]);
    json_of(dir.path(), &["filter", "clear"]);
    let report = json_of(dir.path(), &["filter", "show"]);
    assert_eq!(report["active"], false);
}

#[test]
fn theme_survives_restart() {
    let dir = TempDir::new().expect("tempdir");
    assert_eq!(json_of(dir.path(), &["theme"])["theme"], "light");

    let set = json_of(dir.path(), &["theme", "dark"]);
    assert_eq!(set["changed"], true);
    assert_eq!(json_of(dir.path(), &["theme"])["theme"], "dark");

    let raw = std::fs::read_to_string(prefs_path(dir.path())).expect("prefs written");
    assert!(raw.contains("dark"));
}

#[test]
fn corrupt_preferences_fall_back_to_defaults() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(prefs_path(dir.path()), "{not json").expect("write");
    assert_eq!(json_of(dir.path(), &["theme"])["theme"], "light");
    assert_eq!(feed_ids(dir.path()).len(), 3);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_writes_filtered_document() {
    let dir = TempDir::new().expect("tempdir");
    json_of(dir.path(), &["filter", "user", "u3"]);

    let target = dir.path().join("out.json");
    let target_arg = target.to_str().expect("utf8 path");
    let report = json_of(dir.path(), &["export", "--output", target_arg]);
    assert_eq!(report["total_activities"], 1);

    let doc: Value =
        serde_json::from_str(&std::fs::read_to_string(&target).expect("export written"))
            .expect("export JSON");
    assert_eq!(doc["totalActivities"], 1);
    assert_eq!(doc["activities"][0]["user"], "Carol");
    assert!(doc["exportDate"].as_str().is_some_and(|d| d.ends_with('Z')));
}

#[test]
fn export_to_stdout_and_default_name() {
    let dir = TempDir::new().expect("tempdir");
    let output = hd_cmd(dir.path())
        .args(["export", "--output", "-"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let doc: Value = serde_json::from_slice(&output.stdout).expect("JSON on stdout");
    assert_eq!(doc["totalActivities"], 3);
    assert_eq!(doc["activities"][0]["reactions"]["👍"], 2);

    hd_cmd(dir.path()).arg("export").assert().success();
    let exported = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .any(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with("workspace-activity-") && name.ends_with(".json")
        });
    assert!(exported);
}

// ---------------------------------------------------------------------------
// Live generator
// ---------------------------------------------------------------------------

#[test]
fn seeded_live_run_streams_updates() {
    let dir = TempDir::new().expect("tempdir");
    let output = hd_cmd(dir.path())
        .args(["live", "--ticks", "3", "--interval-ms", "1", "--seed", "42", "--json"])
        .output()
        .expect("run");
    assert!(
        output.status.success(),
        "live failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let lines: Vec<Value> = String::from_utf8(output.stdout)
        .expect("utf8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("JSON line"))
        .collect();
    assert_eq!(lines.len(), 4, "three events plus a summary");

    let summary = &lines[3];
    assert_eq!(summary["delivered"], 3);
    let generated = lines[..3].iter().filter(|e| e.get("activity").is_some()).count();
    assert_eq!(summary["activities"], 3 + generated);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn malformed_config_reports_code() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".huddle")).expect("mkdir");
    std::fs::write(dir.path().join(".huddle/config.toml"), "[generator\n").expect("write");

    let output = hd_cmd(dir.path())
        .args(["feed", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error");
    assert_eq!(err["error"]["error_code"], "E1002");
}

#[test]
fn completions_generate_for_bash() {
    let dir = TempDir::new().expect("tempdir");
    hd_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hd"));
}
