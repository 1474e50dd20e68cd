//! Readiness poll and container state observation.

#![allow(clippy::expect_used)]

use std::time::Duration;

use pgstrap_cli::application::services::container::{observe_state, wait_running};
use pgstrap_cli::domain::error::ProvisionError;
use pgstrap_cli::domain::{ContainerState, ReadinessPolicy};
use tokio_util::sync::CancellationToken;

use crate::mocks::{FakeEngine, RecordingLog, RecordingReporter};

#[tokio::test(start_paused = true)]
async fn running_on_second_observation_sleeps_once() {
    let engine = FakeEngine::running_from(2);
    let reporter = RecordingReporter::default();
    let log = RecordingLog::default();
    let started = tokio::time::Instant::now();

    let observations = wait_running(
        &engine,
        "db",
        &ReadinessPolicy::default(),
        &CancellationToken::new(),
        &reporter,
        &log,
    )
    .await
    .expect("running");

    assert_eq!(observations, 2);
    assert_eq!(engine.listings(), 2);
    assert_eq!(reporter.steps.borrow().as_slice(), ["waiting 3s for container db..."]);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn listing_error_counts_as_one_failed_observation() {
    let mut engine = FakeEngine::running_from(2);
    engine.listing_errors = 1;

    let observations = wait_running(
        &engine,
        "db",
        &ReadinessPolicy::default(),
        &CancellationToken::new(),
        &RecordingReporter::default(),
        &RecordingLog::default(),
    )
    .await
    .expect("running on the retry");

    assert_eq!(observations, 2);
    assert_eq!(engine.listings(), 2);
}

#[tokio::test(start_paused = true)]
async fn listing_errors_on_every_attempt_end_as_not_running() {
    let mut engine = FakeEngine::never_running();
    engine.listing_errors = u32::MAX;

    let err = wait_running(
        &engine,
        "db",
        &ReadinessPolicy::default(),
        &CancellationToken::new(),
        &RecordingReporter::default(),
        &RecordingLog::default(),
    )
    .await
    .expect_err("never listed");

    assert_eq!(
        err.downcast_ref::<ProvisionError>(),
        Some(&ProvisionError::ContainerNotRunning {
            container: "db".to_string(),
            attempts: 2,
        })
    );
}

#[tokio::test]
async fn already_running_does_not_sleep() {
    let engine = FakeEngine::running_from(1);
    let reporter = RecordingReporter::default();
    let observations = wait_running(
        &engine,
        "db",
        &ReadinessPolicy::default(),
        &CancellationToken::new(),
        &reporter,
        &RecordingLog::default(),
    )
    .await
    .expect("running");
    assert_eq!(observations, 1);
    assert!(reporter.steps.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn backoff_policy_bounds_observations() {
    let engine = FakeEngine::never_running();
    let policy = ReadinessPolicy {
        max_attempts: 5,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(2),
        max_wait: Duration::from_secs(60),
    };
    let log = RecordingLog::default();
    let started = tokio::time::Instant::now();

    let err = wait_running(
        &engine,
        "db",
        &policy,
        &CancellationToken::new(),
        &RecordingReporter::default(),
        &log,
    )
    .await
    .expect_err("never running");

    assert_eq!(
        err.downcast_ref::<ProvisionError>(),
        Some(&ProvisionError::ContainerNotRunning {
            container: "db".to_string(),
            attempts: 5,
        })
    );
    // 1 + 2 + 2 + 2
    assert_eq!(started.elapsed(), Duration::from_secs(7));
    assert_eq!(log.errors().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_wait() {
    let engine = FakeEngine::never_running();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let err = wait_running(
        &engine,
        "db",
        &ReadinessPolicy::default(),
        &cancel,
        &RecordingReporter::default(),
        &RecordingLog::default(),
    )
    .await
    .expect_err("cancelled");

    assert!(matches!(
        err.downcast_ref::<ProvisionError>(),
        Some(ProvisionError::Cancelled { .. })
    ));
    assert_eq!(engine.listings(), 1);
}

#[tokio::test]
async fn observe_state_maps_runtime_answers() {
    let engine = FakeEngine::running_from(1);
    assert_eq!(
        observe_state(&engine, "db").await.expect("state"),
        ContainerState::Running
    );

    let engine = FakeEngine::never_running();
    assert_eq!(
        observe_state(&engine, "db").await.expect("state"),
        ContainerState::Absent
    );

    let mut engine = FakeEngine::never_running();
    engine.inspect = Some("restarting".to_string());
    assert_eq!(
        observe_state(&engine, "db").await.expect("state"),
        ContainerState::Starting
    );

    let mut engine = FakeEngine::never_running();
    engine.inspect = Some("exited".to_string());
    assert_eq!(
        observe_state(&engine, "db").await.expect("state"),
        ContainerState::Unreachable
    );
}
