use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_cluster() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("chimr")?;
    let output = cmd
        .arg("cluster")
        .arg("tests/chimr/reads.tsv")
        .arg("tests/chimr/ovlp.paf")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(
        stdout,
        "r0\t2\tchimeric\nr1\t1\tnormal\nr2\t2\tchimeric\nr3\t1\tnormal\nr4\t1\tnormal\ns\t1\tnormal\n"
    );

    Ok(())
}

#[test]
fn command_cluster_selected() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("chimr")?;
    let output = cmd
        .arg("cluster")
        .arg("tests/chimr/reads.tsv")
        .arg("tests/chimr/ovlp.paf")
        .arg("--read")
        .arg("r3")
        .arg("--read")
        .arg("r2")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert_eq!(stdout, "r3\t1\tnormal\nr2\t2\tchimeric\n");

    Ok(())
}

#[test]
fn command_cluster_unknown_read() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("chimr")?;
    cmd.arg("cluster")
        .arg("tests/chimr/reads.tsv")
        .arg("tests/chimr/ovlp.paf")
        .arg("--read")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));

    Ok(())
}
