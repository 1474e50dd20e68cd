//! Integration tests for `pgstrap status`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{configured_dir, pgstrap};

fn without_sudo(dir: &TempDir) {
    std::fs::write(dir.path().join("pgstrap.yaml"), "runtime:\n  use_sudo: false\n")
        .expect("settings");
}

#[test]
fn test_status_empty_dir_reports_missing_profile() {
    let dir = TempDir::new().expect("temp dir");
    without_sudo(&dir);
    pgstrap()
        .args(["--json", "--dir", &dir.path().to_string_lossy(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"profile\": false"))
        .stdout(predicate::str::contains("\"manifest\": false"));
}

#[test]
fn test_status_configured_dir_shows_target() {
    let dir = configured_dir(5544);
    without_sudo(&dir);
    pgstrap()
        .args(["--dir", &dir.path().to_string_lossy(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1:5544"))
        .stdout(predicate::str::contains("pgstrap_postgres"));
}
