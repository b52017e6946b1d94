#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn roster(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("roster").unwrap();
    cmd.current_dir(dir.path()).env("ROSTER_ROOT", dir.path());
    cmd
}

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plant.yaml")
}

fn init_plant(dir: &TempDir) {
    roster(dir).arg("init").assert().success();
    roster(dir)
        .arg("import")
        .arg(fixture())
        .assert()
        .success();
}

fn json(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.arg("--json").output().unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// roster init / config
// ---------------------------------------------------------------------------

#[test]
fn init_creates_config_and_database() {
    let dir = TempDir::new().unwrap();
    roster(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .roster/config.yaml"));

    assert!(dir.path().join(".roster/config.yaml").exists());
    assert!(dir.path().join(".roster/roster.redb").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    roster(&dir).arg("init").assert().success();
    roster(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .roster/config.yaml"));
}

#[test]
fn config_validate_and_show() {
    let dir = TempDir::new().unwrap();
    roster(&dir).arg("init").assert().success();

    roster(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));

    roster(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_absence_percent: 4.5"));
}

#[test]
fn config_validate_fails_on_bad_ceiling() {
    let dir = TempDir::new().unwrap();
    roster(&dir).arg("init").assert().success();
    std::fs::write(
        dir.path().join(".roster/config.yaml"),
        "manning:\n  max_absence_percent: 0\n",
    )
    .unwrap();

    roster(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

// ---------------------------------------------------------------------------
// roster import / generate / calendar
// ---------------------------------------------------------------------------

#[test]
fn import_reports_counts() {
    let dir = TempDir::new().unwrap();
    roster(&dir).arg("init").assert().success();
    roster(&dir)
        .arg("import")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("shift_slots"));
}

#[test]
fn import_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    roster(&dir).arg("init").assert().success();
    roster(&dir)
        .args(["import", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read dataset"));
}

#[test]
fn generate_then_show_calendar_codes() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);

    roster(&dir)
        .args(["generate", "--start", "2025-01-06", "--end", "2025-01-26"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42 days written"));

    // Sick leave on Tuesday, weekly rest on the weekend.
    roster(&dir)
        .args([
            "calendar",
            "--employee",
            "2",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-12",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("M E* M M M D D"));

    roster(&dir)
        .args([
            "calendar",
            "--employee",
            "1",
            "--start",
            "2025-01-20",
            "--end",
            "2025-01-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("statutory_holiday"));
}

#[test]
fn generate_twice_writes_nothing_new() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    let args = ["generate", "--start", "2025-01-06", "--end", "2025-01-12", "--employee", "1"];

    let first = json(roster(&dir).args(args));
    assert_eq!(first["employees"][0]["status"], "written");
    assert_eq!(first["employees"][0]["days"], 7);

    let second = json(roster(&dir).args(args));
    assert_eq!(second["employees"][0]["days"], 0);
    assert_eq!(second["employees"][0]["existing"], 7);
}

#[test]
fn generate_rejects_reversed_window() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args(["generate", "--start", "2025-02-01", "--end", "2025-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid window"));
}

#[test]
fn calendar_unknown_employee_fails() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args([
            "calendar",
            "--employee",
            "99",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-12",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("employee not found: 99"));
}

// ---------------------------------------------------------------------------
// roster run / assign / manning
// ---------------------------------------------------------------------------

#[test]
fn full_run_assigns_senior_employee_first() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);

    let report = json(roster(&dir).args(["run", "--start", "2025-01-06", "--end", "2025-02-02"]));
    assert_eq!(report["seniority_updated"], 2);
    assert_eq!(report["assignment_start"], "2025-01-08");
    assert_eq!(report["assignment_end"], "2025-12-10");

    let employees = report["areas"][0]["groups"][0]["employees"]
        .as_array()
        .unwrap();
    let converted = |id: u64| -> Vec<String> {
        employees
            .iter()
            .find(|e| e["employee_id"] == id)
            .unwrap()["dates"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|d| d["status"] == "converted")
            .map(|d| d["date"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(converted(1), vec!["2025-01-08", "2025-01-09", "2025-01-10"]);
    assert_eq!(converted(2), vec!["2025-01-13", "2025-01-14", "2025-01-15"]);

    roster(&dir)
        .args([
            "calendar",
            "--employee",
            "1",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-12",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("M M VA VA VA D D"));

    roster(&dir)
        .args(["manning", "--group", "10", "--date", "2025-01-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains("can add absence:   no"));
}

#[test]
fn assign_after_run_has_nothing_left() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args(["run", "--start", "2025-01-06", "--end", "2025-02-02"])
        .assert()
        .success();

    roster(&dir)
        .args([
            "assign",
            "--start",
            "2025-01-06",
            "--end",
            "2025-02-02",
            "--group",
            "10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exhausted"))
        .stdout(predicate::str::contains("0 vacation days assigned"));
}

#[test]
fn assign_unknown_group_fails() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args([
            "assign",
            "--start",
            "2025-01-06",
            "--end",
            "2025-01-31",
            "--group",
            "77",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group not found: 77"));
}

#[test]
fn manning_on_quiet_day_allows_absence() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args(["generate", "--start", "2025-01-06", "--end", "2025-01-12"])
        .assert()
        .success();

    let status = json(roster(&dir).args(["manning", "--group", "10", "--date", "2025-01-09"]));
    assert_eq!(status["employee_count"], 2);
    assert_eq!(status["small_group"], true);
    assert_eq!(status["can_add_absence"], true);
}

#[test]
fn calendar_filters_by_classification() {
    let dir = TempDir::new().unwrap();
    init_plant(&dir);
    roster(&dir)
        .args(["run", "--start", "2025-01-06", "--end", "2025-02-02"])
        .assert()
        .success();

    let days = json(roster(&dir).args([
        "calendar",
        "--employee",
        "2",
        "--start",
        "2025-01-06",
        "--end",
        "2025-02-02",
        "--only",
        "auto_vacation",
    ]));
    let dates: Vec<&str> = days
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-01-13", "2025-01-14", "2025-01-15"]);

    roster(&dir)
        .args([
            "calendar",
            "--employee",
            "2",
            "--start",
            "2025-01-06",
            "--end",
            "2025-02-02",
            "--only",
            "holiday",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid classification: holiday"));
}
