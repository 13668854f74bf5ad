use assert_cmd::Command;
use tempfile::tempdir;

fn flick(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("flick").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_options() {
    let home = tempdir().unwrap();
    let output = flick(home.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--duration"));
    assert!(stdout.contains("--leaderboard"));
}

#[test]
fn empty_history_and_leaderboard_report() {
    let home = tempdir().unwrap();
    let output = flick(home.path())
        .args(["--history", "--leaderboard", "-p", "ace"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rank"));
    assert!(stdout.contains("score"));
}

#[test]
fn export_csv_creates_file() {
    let home = tempdir().unwrap();
    let out = home.path().join("scores.csv");

    flick(home.path())
        .arg("--export-csv")
        .arg(&out)
        .assert()
        .success();

    assert!(out.exists());
}

#[test]
fn reset_scores_reports_zero_on_fresh_store() {
    let home = tempdir().unwrap();
    let output = flick(home.path())
        .args(["--reset-scores", "-p", "ace"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("removed 0 scores for ace"));
}

#[test]
fn non_tty_stdin_is_rejected() {
    let home = tempdir().unwrap();
    flick(home.path()).write_stdin("").assert().failure();
}
