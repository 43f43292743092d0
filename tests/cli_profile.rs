use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn command_profile() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("chimr")?;
    let output = cmd
        .arg("profile")
        .arg("tests/chimr/reads.tsv")
        .arg("tests/chimr/ovlp.paf")
        .arg("--max-jump")
        .arg("50")
        .arg("--max-overhang")
        .arg("50")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // The short read s has no profile
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.contains("r0\t1000\t4\tnormal\t5,4,4,4,4,4,4,4\n"));
    assert!(stdout.contains("r1\t1000\t4\tnormal\t4,4,4,4,4,4,4,4\n"));
    assert!(stdout.contains("r2\t1000\t0\tchimeric\t4,4,4,0,4,4,4,4\n"));
    assert!(stdout.contains("r3\t1000\t0\tchimeric\t0,0,0,0,4,4,4,4\n"));
    assert!(stdout.contains("r4\t1000\t0\tchimeric\t4,4,4,0,0,0,0,0\n"));
    assert!(!stdout.contains("s\t250"));

    Ok(())
}

#[test]
fn command_profile_logs_coverage() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("chimr")?;
    cmd.arg("profile")
        .arg("tests/chimr/reads.tsv")
        .arg("tests/chimr/ovlp.paf")
        .arg("--max-jump")
        .arg("50")
        .arg("--max-overhang")
        .arg("50")
        .arg("-v")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Estimated coverage: 7.56"));

    Ok(())
}
