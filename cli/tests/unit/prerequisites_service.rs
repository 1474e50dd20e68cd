//! Platform detection and prerequisite installs.

#![allow(clippy::expect_used)]

use pgstrap_cli::application::services::platform::detect_platform;
use pgstrap_cli::application::services::prerequisites::ensure_prerequisites;
use pgstrap_cli::domain::error::ProvisionError;
use pgstrap_cli::domain::{PackageManager, PlatformFamily, Tool};

use crate::helpers::UBUNTU_OS_RELEASE;
use crate::mocks::{FakeHost, RecordingLog, RecordingReporter};

#[tokio::test]
async fn detects_family_from_os_release() {
    let host = FakeHost::with_os_release("NAME=Rocky\nID=\"rocky\"\n");
    let family = detect_platform(&host, &RecordingLog::default())
        .await
        .expect("rocky");
    assert_eq!(family, PlatformFamily::Rhel);

    let host = FakeHost::with_os_release(UBUNTU_OS_RELEASE);
    let family = detect_platform(&host, &RecordingLog::default())
        .await
        .expect("ubuntu");
    assert_eq!(family.package_manager(), PackageManager::Apt);
}

#[tokio::test]
async fn unreadable_os_release_is_unsupported_platform() {
    let host = FakeHost {
        os_release: None,
        ..FakeHost::with_os_release("")
    };
    let log = RecordingLog::default();
    let err = detect_platform(&host, &log).await.expect_err("no file");
    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::PlatformUnsupported { .. })
    ));
    assert_eq!(log.errors().len(), 1);
}

#[tokio::test]
async fn only_missing_tools_are_installed() {
    let mut host = FakeHost::with_os_release(UBUNTU_OS_RELEASE);
    host.missing = vec![Tool::Docker, Tool::OpenSsl];

    let report = ensure_prerequisites(
        &host,
        PackageManager::Dnf,
        &RecordingReporter::default(),
        &RecordingLog::default(),
    )
    .await
    .expect("installs");

    assert_eq!(report.present, vec![Tool::DockerCompose]);
    assert_eq!(report.installed, vec![Tool::Docker, Tool::OpenSsl]);
    assert_eq!(
        host.installs.borrow().as_slice(),
        [
            (PackageManager::Dnf, Tool::Docker),
            (PackageManager::Dnf, Tool::OpenSsl)
        ]
    );
}

#[tokio::test]
async fn first_failed_install_aborts_the_rest() {
    let mut host = FakeHost::with_os_release(UBUNTU_OS_RELEASE);
    host.missing = Tool::ALL.to_vec();
    host.fail_install = Some(Tool::Docker);
    let log = RecordingLog::default();

    let err = ensure_prerequisites(
        &host,
        PackageManager::Apt,
        &RecordingReporter::default(),
        &log,
    )
    .await
    .expect_err("docker install fails");

    assert_eq!(
        err.downcast_ref::<ProvisionError>(),
        Some(&ProvisionError::InstallFailed {
            tool: "docker".to_string(),
            manager: "apt".to_string(),
        })
    );
    assert!(host.installs.borrow().is_empty());
    assert!(log.errors()[0].contains("docker.io"), "got: {:?}", log.errors());
}
