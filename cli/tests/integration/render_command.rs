//! Integration tests for `pgstrap render`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;
use tempfile::TempDir;

use crate::{configured_dir, pgstrap};

const MANIFEST: &str = ".docker/compose/docker-compose.yml";

#[test]
fn test_render_writes_manifest_and_seeds_mount() {
    let dir = configured_dir(5433);
    pgstrap()
        .args(["--dir", &dir.path().to_string_lossy(), "render"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose.yml"));

    let text = std::fs::read_to_string(dir.path().join(MANIFEST)).expect("manifest");
    assert!(text.starts_with("# THIS FILE IS AUTO-GENERATED BY pgstrap"));
    assert!(text.contains("\"5433:5432\""));
    assert!(text.contains("\"s3cret$$\""), "dollar must be doubled: {text}");
    assert!(text.contains("\"172.28.0.0/24\""));
    assert!(
        dir.path()
            .join(".docker/compose/mounts/pg_hba.conf")
            .is_file()
    );
}

#[test]
fn test_render_twice_is_byte_identical() {
    let dir = configured_dir(6000);
    let arg = dir.path().to_string_lossy().into_owned();
    pgstrap().args(["--dir", &arg, "render"]).assert().success();
    let first = std::fs::read(dir.path().join(MANIFEST)).expect("manifest");
    pgstrap().args(["--dir", &arg, "render"]).assert().success();
    let second = std::fs::read(dir.path().join(MANIFEST)).expect("manifest");
    assert_eq!(first, second);
}

#[test]
fn test_render_without_env_reports_profile_invalid() {
    let dir = TempDir::new().expect("temp dir");
    pgstrap()
        .args(["--json", "--dir", &dir.path().to_string_lossy(), "render"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"code\": \"PROFILE_INVALID\""));

    let log = std::fs::read_to_string(dir.path().join("pgstrap.log")).expect("event log");
    assert!(log.contains("failed to load environment file"), "got: {log}");
}
