//! Integration tests for the speckit CLI

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TASKS: &str = "# Tasks: Demo\n\n- [ ] T001 [P] Setup project\n- [ ] T002 [US1] Implement feature\n";

/// Get a Command for the speckit binary, isolated from user settings
fn speckit(project: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("speckit"));
    cmd.env("XDG_CONFIG_HOME", project.join(".user-config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--project")
        .arg(project);
    cmd
}

/// Create a project with `specs/001-demo/{plan,tasks}.md`
fn feature_project() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let feature = temp.path().join("specs/001-demo");
    fs::create_dir_all(&feature).unwrap();
    fs::write(feature.join("plan.md"), "# Plan\n\nA Python service.\n").unwrap();
    fs::write(feature.join("tasks.md"), TASKS).unwrap();
    (temp, feature)
}

fn add_checklist(feature: &Path, name: &str, content: &str) {
    let dir = feature.join("checklists");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_help() {
    Command::new(cargo::cargo_bin!("speckit"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("implement"))
        .stdout(predicate::str::contains("checklists"));
}

#[test]
fn test_version() {
    Command::new(cargo::cargo_bin!("speckit"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_implement_checks_off_tasks() {
    let (temp, feature) = feature_project();

    speckit(temp.path())
        .arg("implement")
        .assert()
        .success()
        .stdout(predicate::str::contains("Implementation complete: 2 task(s)"))
        .stdout(predicate::str::contains("T001 [P]: Setup project"));

    let content = fs::read_to_string(feature.join("tasks.md")).unwrap();
    assert!(content.contains("- [X] T001 [P] Setup project"));
    assert!(content.contains("- [X] T002 [US1] Implement feature"));
    assert!(!feature.join("tasks.md.lock").exists());
}

#[test]
fn test_implement_json_report() {
    let (temp, _feature) = feature_project();

    let output = speckit(temp.path())
        .arg("implement")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["execution"]["phases"][0]["phase"], "setup");
    assert_eq!(report["execution"]["phases"][0]["parallel"][0], "T001");
    assert_eq!(report["update"]["updated"].as_array().unwrap().len(), 2);
    assert_eq!(report["setup"]["technologies"][0], "Python");
    assert_eq!(report["checklists"]["result"], "no_checklists");
}

#[test]
fn test_implement_declined_checklists() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "ux.md", "- [x] Layout\n- [ ] Copy reviewed\n");

    speckit(temp.path())
        .arg("implement")
        .write_stdin("no\n")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("| ux.md | 2 | 1 | 1 | ✗ FAIL |"))
        .stderr(predicate::str::contains("Checklists incomplete: ux.md"));

    assert_eq!(fs::read_to_string(feature.join("tasks.md")).unwrap(), TASKS);
}

#[test]
fn test_implement_closed_stdin_declines() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "ux.md", "- [ ] Copy reviewed\n");

    speckit(temp.path()).arg("implement").assert().failure();
    assert_eq!(fs::read_to_string(feature.join("tasks.md")).unwrap(), TASKS);
}

#[test]
fn test_implement_yes_overrides_checklists() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "ux.md", "- [ ] Copy reviewed\n");

    speckit(temp.path())
        .arg("implement")
        .arg("--yes")
        .assert()
        .success();

    let content = fs::read_to_string(feature.join("tasks.md")).unwrap();
    assert!(content.contains("- [X] T002 [US1] Implement feature"));
}

#[test]
fn test_implement_skip_checklists() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "ux.md", "- [ ] Copy reviewed\n");

    speckit(temp.path())
        .arg("implement")
        .arg("--skip-checklists")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checklist status").not());
}

#[test]
fn test_implement_explicit_tasks_file() {
    let (temp, feature) = feature_project();
    fs::write(temp.path().join("extra.md"), "- [ ] T100 Polish release notes\n").unwrap();

    speckit(temp.path())
        .arg("implement")
        .arg("--tasks-file")
        .arg("extra.md")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(temp.path().join("extra.md")).unwrap(),
        "- [X] T100 Polish release notes\n"
    );
    assert_eq!(fs::read_to_string(feature.join("tasks.md")).unwrap(), TASKS);
}

#[test]
fn test_implement_project_settings_disable_prerequisites() {
    let (temp, _feature) = feature_project();
    fs::create_dir_all(temp.path().join(".specify")).unwrap();
    fs::write(
        temp.path().join(".specify/settings.json"),
        r#"{ "prerequisites": { "enabled": false } }"#,
    )
    .unwrap();

    let output = speckit(temp.path())
        .arg("implement")
        .arg("--json")
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["prerequisite_warning"].is_null());
}

#[test]
fn test_implement_invalid_settings() {
    let (temp, _feature) = feature_project();
    fs::create_dir_all(temp.path().join(".specify")).unwrap();
    fs::write(temp.path().join(".specify/settings.json"), "{ nope").unwrap();

    speckit(temp.path())
        .arg("implement")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_implement_without_feature() {
    let temp = TempDir::new().unwrap();

    speckit(temp.path())
        .arg("implement")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Feature directory not found"));
}

#[test]
fn test_implement_missing_tasks() {
    let (temp, feature) = feature_project();
    fs::remove_file(feature.join("tasks.md")).unwrap();

    speckit(temp.path())
        .arg("implement")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required file"));
}

#[test]
fn test_checklists_command() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "api.md", "- [x] Versioned\n");
    add_checklist(&feature, "ux.md", "- [ ] Copy reviewed\n");

    speckit(temp.path())
        .arg("checklists")
        .assert()
        .failure()
        .stdout(predicate::str::contains("| api.md | 1 | 1 | 0 | ✓ PASS |"))
        .stdout(predicate::str::contains("| ux.md | 1 | 0 | 1 | ✗ FAIL |"));
}

#[test]
fn test_checklists_command_json_passing() {
    let (temp, feature) = feature_project();
    add_checklist(&feature, "api.md", "- [x] Versioned\n- [X] Documented\n");

    let output = speckit(temp.path())
        .arg("checklists")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let statuses: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(statuses[0]["name"], "api.md");
    assert_eq!(statuses[0]["completed"], 2);
}

#[test]
fn test_tasks_command_is_read_only() {
    let (temp, feature) = feature_project();

    speckit(temp.path())
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("US1"))
        .stdout(predicate::str::contains("2 task(s) in 2 phase(s)"));

    assert_eq!(fs::read_to_string(feature.join("tasks.md")).unwrap(), TASKS);
}

#[test]
fn test_tasks_command_with_feature_dir() {
    let (temp, _feature) = feature_project();

    let output = speckit(temp.path())
        .arg("tasks")
        .arg("--feature-dir")
        .arg("specs/001-demo")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let phases: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(phases[1]["phase"]["story"], "US1");
    assert_eq!(phases[1]["sequential"][0], "T002");
}

#[test]
fn test_second_run_is_a_no_op() {
    let (temp, feature) = feature_project();

    speckit(temp.path()).arg("implement").assert().success();
    let after_first = fs::read_to_string(feature.join("tasks.md")).unwrap();

    speckit(temp.path())
        .arg("implement")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 task(s)"));
    assert_eq!(
        fs::read_to_string(feature.join("tasks.md")).unwrap(),
        after_first
    );
}

#[test]
fn test_verbose_flag() {
    let (temp, _feature) = feature_project();

    speckit(temp.path())
        .arg("--verbose")
        .arg("tasks")
        .assert()
        .success();
}

#[test]
fn test_nonexistent_project() {
    Command::new(cargo::cargo_bin!("speckit"))
        .arg("--project")
        .arg("/nonexistent/path/that/does/not/exist")
        .arg("implement")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
