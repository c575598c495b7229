use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_directives_write_to_stdout() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(
        file,
        ":- write('Hello world'), nl."
    )
    .expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello world").and(predicate::str::contains("\n")));
}

#[test]
fn test_query_flag_prints_bindings() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(
        file,
        "parent(john, mary).
parent(mary, sue)."
    )
    .expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .arg("--query")
        .arg("parent(john, X).")
        .assert()
        .success()
        .stdout(predicate::str::contains("X = mary"));
}

#[test]
fn test_query_flag_enumerates_all_solutions() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(file, "color(red). color(green).").expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .arg("--query")
        .arg("color(C).")
        .assert()
        .success()
        .stdout(predicate::str::contains("C = red").and(predicate::str::contains("C = green")));
}

#[test]
fn test_failed_query_prints_false() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(file, "color(red).").expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .arg("--query")
        .arg("color(blue).")
        .assert()
        .success()
        .stdout(predicate::str::contains("false."));
}

#[test]
fn test_variable_free_success_prints_true() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(file, "color(red).").expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .arg("--query")
        .arg("color(red).")
        .assert()
        .success()
        .stdout(predicate::str::contains("true."));
}

#[test]
fn test_parse_error_exits_nonzero() {
    let mut file = Builder::new()
        .suffix(".pl")
        .tempfile()
        .expect("Could not create temp file");
    writeln!(file, "broken(").expect("Could not write to temp file");

    let path = file.path();

    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.arg(path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));
}

#[test]
fn test_missing_arguments_shows_usage() {
    let mut cmd = Command::cargo_bin("hornlog").expect("Could not find hornlog binary");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
