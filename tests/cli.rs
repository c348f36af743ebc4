mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::str::contains;

fn codegen() -> Command {
    let mut cmd = Command::cargo_bin("waas-codegen").expect("binary exists");
    cmd.env("RUST_LOG", "waas_codegen=info");
    cmd
}

#[test]
fn generates_person_classes_by_default() {
    let workspace = TestWorkspace::new();
    workspace.write_survey("person");

    codegen()
        .args(["--data-dir", workspace.path().to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("Generated code was written to"));

    let dir = workspace.source_dir("person");
    let count = std::fs::read_dir(&dir).expect("read source dir").count();
    assert_eq!(count, 9);
    assert!(workspace.report_path("person").exists());
}

#[test]
fn generates_each_requested_record_type() {
    let workspace = TestWorkspace::new();
    workspace.write_survey("person");
    workspace.write_survey("hhold");

    codegen()
        .args([
            "--data-dir",
            workspace.path().to_str().unwrap(),
            "--record-type",
            "hhold",
            "--record-type",
            "person",
            "--no-report",
        ])
        .assert()
        .success();

    assert!(workspace.source_dir("hhold").join("WaAS_W1W2W3W4W5HRecord.java").exists());
    assert!(workspace.source_dir("person").join("WaAS_W4PRecord.java").exists());
    assert!(!workspace.report_path("person").exists());
}

#[test]
fn missing_inputs_fail_with_error_message() {
    let workspace = TestWorkspace::new();

    codegen()
        .args(["--data-dir", workspace.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("error:"))
        .stderr(contains("wave 1"));
}

#[test]
fn unknown_encoding_is_rejected() {
    let workspace = TestWorkspace::new();
    workspace.write_survey("person");

    codegen()
        .args([
            "--data-dir",
            workspace.path().to_str().unwrap(),
            "--input-encoding",
            "not-an-encoding",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding"));
}
