//! End to end tests of the `timers` binary against a temporary store file.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn timers(file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("timers").expect("binary should build");
    cmd.env_remove("TIMERS_FILE")
        .env_remove("TIMERS_LENIENT")
        .env_remove("RUST_LOG")
        .arg("--file")
        .arg(file);
    cmd
}

#[test]
fn create_stop_start_list() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("timers");

    timers(&file)
        .args(["create", "work"])
        .assert()
        .success()
        .stdout("created tracker \"work\"\n");

    timers(&file)
        .args(["stop", "work"])
        .assert()
        .success()
        .stdout("stopped tracker \"work\"\n");

    timers(&file)
        .args(["start", "work"])
        .assert()
        .success()
        .stdout("started tracker \"work\"\n");

    let contents = fs::read_to_string(&file).unwrap();
    let tokens: Vec<&str> = contents.split_whitespace().collect();
    assert_eq!(tokens[0], "work");
    assert_eq!(tokens.len(), 4);
    assert!(contents.ends_with('\n'));

    timers(&file)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Label").and(predicate::str::contains("work")));

    timers(&file)
        .args(["list", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running"));
}

#[test]
fn errors_exit_non_zero() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("timers");

    timers(&file).args(["new", "work"]).assert().success();

    timers(&file)
        .args(["start", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tracker \"work\" already running"));

    timers(&file)
        .args(["create", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    timers(&file)
        .args(["delete", "play"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tracker \"play\" does not exist"));

    let contents = fs::read_to_string(&file).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn delete_keeps_other_trackers() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("timers");
    fs::write(
        &file,
        "a 2012-11-01T22:08:41+00:00 2012-11-01T22:20:41+00:00\n\
         b 2012-11-01T22:08:41+00:00\n\
         c 2012-11-02T08:00:00+00:00 2012-11-02T09:00:00+00:00\n",
    )
    .unwrap();

    timers(&file)
        .args(["delete", "b"])
        .assert()
        .success()
        .stdout("deleted tracker \"b\"\n");

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "a 2012-11-01T22:08:41+00:00 2012-11-01T22:20:41+00:00\n\
         c 2012-11-02T08:00:00+00:00 2012-11-02T09:00:00+00:00\n"
    );
}

#[test]
fn list_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("timers");

    timers(&file)
        .arg("list")
        .assert()
        .success()
        .stdout("Label  Duration  Status\n");

    assert!(!file.exists());
}

#[test]
fn corrupt_lines() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("timers");
    fs::write(
        &file,
        "a 2012-11-01T22:08:41+00:00 2012-11-01T22:20:41+00:00\nb not-a-date\n",
    )
    .unwrap();

    timers(&file)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    timers(&file)
        .args(["--lenient", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a ").and(predicate::str::contains("b ").not()));
}
