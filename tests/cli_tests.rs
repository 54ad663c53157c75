#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::{NamedTempFile, TempDir};

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("STUDY_PLANNER_STORAGE", "memory")
        .env("RUST_LOG", "off")
        .write_stdin(script.to_string())
        .assert()
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn cli_adds_and_shows_tasks() {
    run_cli("add monday 45 Read chapter 4\nshow\nquit\n")
        .success()
        .stdout(str_contains("Read chapter 4"))
        .stdout(str_contains("Daily limit: 150 minutes"));
}

#[test]
fn cli_reports_validation_errors() {
    run_cli("add monday 0 Nothing\nadd someday 10 Task\nadd monday 10 <b>x</b>\nquit\n")
        .success()
        .stdout(str_contains("duration must be positive"))
        .stdout(str_contains("invalid day 'someday'"))
        .stdout(str_contains("markup"));
}

#[test]
fn cli_warns_when_a_day_cannot_be_balanced() {
    run_cli("add monday 100 Algebra\nadd monday 80 Physics\nquit\n")
        .success()
        .stdout(str_contains("[warning] Cannot redistribute tasks on monday"));
}

#[test]
fn cli_delete_command_reports_unknown_ids() {
    run_cli("delete task-none\nquit\n")
        .success()
        .stdout(str_contains("Task task-none not found."));
}

#[test]
fn cli_stats_summarise_the_plan() {
    run_cli("add tuesday 30 Notes\nadd friday 60 Essay\nstats\nquit\n")
        .success()
        .stdout(str_contains("Total tasks      : 2"))
        .stdout(str_contains("Total minutes    : 90"));
}

#[test]
fn cli_rejects_unknown_commands() {
    run_cli("frobnicate\nexit\n")
        .success()
        .stdout(str_contains("Unknown command 'frobnicate'"));
}

#[test]
fn cli_export_and_import_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "add wednesday 40 Persisted task\nexport {path}\nreset\nimport {path}\nday wednesday\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = stdout_of(&assert);
    assert!(output.contains("Tasks exported to"), "{output}");
    assert!(output.contains("Imported 1 tasks"), "{output}");
    let after_import = output.split("Imported 1 tasks").last().unwrap_or_default();
    assert!(after_import.contains("Persisted task"), "{after_import}");
}

#[test]
fn cli_plan_survives_restart_with_json_storage() {
    let dir = TempDir::new().unwrap();
    let run = |script: &str| {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("cli").expect("cli binary");
        cmd.env("STUDY_PLANNER_STORAGE", "json")
            .env("STUDY_PLANNER_DATA_PATH", dir.path())
            .env("STUDY_PLANNER_USER", "tester")
            .env("RUST_LOG", "off")
            .write_stdin(script.to_string())
            .assert()
            .success()
    };

    run("add thursday 25 Durable task\nquit\n");
    assert!(dir.path().join("tester.json").exists());
    run("show\nquit\n").stdout(str_contains("Durable task"));
}
