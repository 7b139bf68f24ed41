//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn carzone() -> Command {
    let mut cmd = Command::cargo_bin("carzone").unwrap();
    // Keep the developer's shell and .env out of the picture
    for var in ["SECRET_KEY", "DB_HOST", "DB_PORT", "BIND_ADDR", "REQUEST_TIMEOUT"] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_serve() {
    carzone()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help() {
    carzone()
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Secret used to sign"))
        .stdout(predicate::str::contains("--db-host"));
}

#[test]
fn test_serve_requires_secret_key() {
    let dir = tempfile::tempdir().unwrap();
    carzone()
        .current_dir(dir.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--secret-key"));
}

#[test]
fn test_serve_rejects_bad_port() {
    let dir = tempfile::tempdir().unwrap();
    carzone()
        .current_dir(dir.path())
        .args(["serve", "--secret-key", "x", "--db-port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--db-port"));
}
