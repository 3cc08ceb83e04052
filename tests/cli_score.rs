use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn get_input_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/merge");
    path.push(filename);
    path
}

#[test]
fn command_score() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score")
        .arg("stdin")
        .write_stdin("0\t9\t0\t9\t+\n20\t29\t20\t29\t+\n");
    cmd.assert().success().stdout("49\n");

    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score")
        .arg("stdin")
        .write_stdin("0\t9\t0\t9\t+\n15\t24\t40\t49\t+\n");
    cmd.assert().success().stdout("29\n");

    Ok(())
}

#[test]
fn command_score_mismatches() -> anyhow::Result<()> {
    // 8 * 3 - 2 and 10 * 3, adjacent
    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score")
        .arg("stdin")
        .write_stdin("0\t9\t0\t9\t+\t2\n10\t19\t10\t19\t+\n");
    cmd.assert().success().stdout("52\n");

    Ok(())
}

#[test]
fn command_score_unordered() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score").arg(get_input_path("abc.tsv"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Chain is not ordered: member 1 does not precede member 2",
        ));

    Ok(())
}

#[test]
fn command_score_malformed() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score").arg("stdin").write_stdin("9\t0\t0\t9\t+\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("query_end < query_start"));

    let mut cmd = Command::cargo_bin("mergetree")?;
    cmd.arg("score").arg("stdin").write_stdin("0\t9\t0\n");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("stdin:1"));

    Ok(())
}
