use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn runs_without_arguments() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.assert().success();
}

#[test]
fn adds_two_inputs() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("run")
        .arg("tests/files/add.asm")
        .write_stdin("3\n4\n");
    cmd.assert()
        .success()
        .stdout(contains("7"))
        .stdout(contains("Halted"));
}

#[test]
fn runs_bare_path_like_run_subcommand() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("tests/files/countdown.asm");
    cmd.assert().success().stdout(contains("Halted"));
}

#[test]
fn counts_down_to_zero() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("run").arg("tests/files/countdown.asm");
    cmd.assert().success().stdout(contains("3\n2\n1\n0\n"));
}

#[test]
fn reprompts_until_input_is_usable() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("run")
        .arg("tests/files/add.asm")
        .write_stdin("not a number\n1500\n3\n4\n");
    cmd.assert().success().stdout(contains("7"));
}

#[test]
fn check_reports_success() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("check").arg("tests/files/add.asm");
    cmd.assert().success().stdout(contains("Success"));
}

#[test]
fn check_rejects_undefined_label() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("check").arg("tests/files/undefined.asm");
    cmd.assert().failure().stderr(contains("undefined label"));
}

#[test]
fn limit_aborts_non_halting_program() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("run")
        .arg("tests/files/spin.asm")
        .args(["--limit", "50"]);
    cmd.assert().failure().stderr(contains("without halting"));
}

#[test]
fn rejects_unknown_extension() {
    let mut cmd = Command::cargo_bin("mailman").unwrap();
    cmd.arg("run").arg("Cargo.toml");
    cmd.assert()
        .failure()
        .stderr(contains("Expected an `.asm` file"));
}
