//! Argument vectors produced by the runtime and host adapters.

#![allow(clippy::expect_used)]

use std::path::Path;

use pgstrap_cli::application::ports::{ContainerEngine, HostPlatform};
use pgstrap_cli::domain::{PackageManager, Tool};
use pgstrap_cli::infra::docker::DockerCli;
use pgstrap_cli::infra::host::HostSystem;

use crate::mocks::RecordingRunner;

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn compose_up_is_elevated_and_detached() {
    let runner = RecordingRunner::default();
    let docker = DockerCli::new(&runner, true);
    docker
        .compose_up(Path::new("/w/.docker/compose/docker-compose.yml"))
        .await
        .expect("compose");

    assert_eq!(
        runner.argv(0),
        argv(&[
            "sudo",
            "docker-compose",
            "-f",
            "/w/.docker/compose/docker-compose.yml",
            "up",
            "-d"
        ])
    );
}

#[tokio::test]
async fn listing_filters_by_exact_name_without_sudo() {
    let runner = RecordingRunner::default();
    let docker = DockerCli::new(&runner, false);
    docker.list_running("pgstrap_postgres").await.expect("ps");
    docker.inspect_status("pgstrap_postgres").await.expect("inspect");

    assert_eq!(
        runner.argv(0),
        argv(&["docker", "ps", "--filter", "name=^pgstrap_postgres$", "--quiet"])
    );
    assert_eq!(
        runner.argv(1),
        argv(&["docker", "inspect", "--format", "{{.State.Status}}", "pgstrap_postgres"])
    );
}

#[tokio::test]
async fn exec_places_user_before_container() {
    let runner = RecordingRunner::default();
    let docker = DockerCli::new(&runner, true);
    docker
        .exec("db", Some("postgres"), &["pg_ctl", "reload", "-D", "/data"])
        .await
        .expect("exec");
    docker.enable_service().await.expect("enable");

    assert_eq!(
        runner.argv(0),
        argv(&[
            "sudo", "docker", "exec", "-u", "postgres", "db", "pg_ctl", "reload", "-D", "/data"
        ])
    );
    assert_eq!(runner.argv(1), argv(&["sudo", "systemctl", "enable", "docker"]));
}

#[tokio::test]
async fn apt_install_refreshes_indexes_first() {
    let runner = RecordingRunner::default();
    let host = HostSystem::new(&runner, true);
    host.install(PackageManager::Apt, Tool::Docker)
        .await
        .expect("install");

    assert_eq!(runner.argv(0), argv(&["sudo", "apt-get", "update"]));
    assert_eq!(
        runner.argv(1),
        argv(&["sudo", "apt-get", "install", "-y", "docker.io"])
    );
}

#[tokio::test]
async fn os_release_path_can_be_overridden() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("os-release");
    std::fs::write(&path, "ID=arch\n").expect("write");

    let host = HostSystem::new(RecordingRunner::default(), false).with_os_release(path);
    let content = host.read_os_release().await.expect("read");
    assert_eq!(content, "ID=arch\n");
}
