//! Container lifecycle: runtime start, compose up, readiness poll, and
//! state observation.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ContainerEngine, EventLog, ProgressReporter};
use crate::application::services::{failure_detail, logged};
use crate::domain::error::ProvisionError;
use crate::domain::{ContainerState, ReadinessPolicy};

fn runtime_failure(step: &str, result: Result<Output>) -> Result<()> {
    let detail = match result {
        Ok(output) if output.status.success() => return Ok(()),
        Ok(output) => failure_detail(&output),
        Err(e) => format!("{e:#}"),
    };
    Err(ProvisionError::RuntimeStartFailed {
        detail: format!("{step}: {detail}"),
    }
    .into())
}

/// Enable and start the container runtime service.
///
/// # Errors
///
/// Returns `ProvisionError::RuntimeStartFailed`; there is no retry.
pub async fn start_runtime(engine: &impl ContainerEngine, log: &impl EventLog) -> Result<()> {
    let result = async {
        runtime_failure("enable docker", engine.enable_service().await)?;
        runtime_failure("start docker", engine.start_service().await)
    }
    .await;
    logged(log, "failed to start container runtime", result)?;
    log.record("container runtime started", None);
    Ok(())
}

/// Launch the services declared in `manifest` in the background.
///
/// Running this against services that are already up succeeds.
///
/// # Errors
///
/// Returns `ProvisionError::RuntimeStartFailed` when compose exits non-zero.
pub async fn compose_up(
    engine: &impl ContainerEngine,
    manifest: &Path,
    log: &impl EventLog,
) -> Result<()> {
    let result = runtime_failure("compose up", engine.compose_up(manifest).await);
    logged(log, "failed to launch database container", result)?;
    log.record("database container launched", None);
    Ok(())
}

/// One observation: does the runtime list `container` as running?
async fn is_running(engine: &impl ContainerEngine, container: &str) -> Result<bool> {
    let output = engine
        .list_running(container)
        .await
        .with_context(|| format!("listing containers named {container}"))?;
    if !output.status.success() {
        tracing::warn!(detail = %failure_detail(&output), "container listing failed");
        return Ok(false);
    }
    Ok(!String::from_utf8_lossy(&output.stdout).trim().is_empty())
}

/// Poll observation: a listing that cannot run counts as "not running" so
/// the attempt budget still applies.
async fn observe_running(engine: &impl ContainerEngine, container: &str) -> bool {
    match is_running(engine, container).await {
        Ok(running) => running,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "container listing failed");
            false
        }
    }
}

/// Poll until `container` is running, following `policy`.
///
/// The first observation is immediate. Returns the number of observations
/// made, including the successful one.
///
/// # Errors
///
/// - `ProvisionError::ContainerNotRunning` once attempts or the wait budget
///   run out.
/// - `ProvisionError::Cancelled` when `cancel` fires during the wait.
pub async fn wait_running(
    engine: &impl ContainerEngine,
    container: &str,
    policy: &ReadinessPolicy,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
    log: &impl EventLog,
) -> Result<u32> {
    let result = poll(engine, container, policy, cancel, reporter).await;
    let observations = logged(log, "database container is not running", result)?;
    log.record(&format!("container {container} is running"), None);
    Ok(observations)
}

async fn poll(
    engine: &impl ContainerEngine,
    container: &str,
    policy: &ReadinessPolicy,
    cancel: &CancellationToken,
    reporter: &impl ProgressReporter,
) -> Result<u32> {
    let cancelled = || -> anyhow::Error {
        ProvisionError::Cancelled {
            stage: format!("waiting for container '{container}'"),
        }
        .into()
    };
    let mut sleeps = policy.sleeps().into_iter();
    let mut observations = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }
        observations += 1;
        if observe_running(engine, container).await {
            tracing::debug!(observations, "container running");
            return Ok(observations);
        }
        let Some(delay) = sleeps.next() else {
            break;
        };
        reporter.step(&format!(
            "waiting {}s for container {container}...",
            delay.as_secs()
        ));
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(cancelled()),
            () = tokio::time::sleep(delay) => {}
        }
    }
    Err(ProvisionError::ContainerNotRunning {
        container: container.to_string(),
        attempts: observations,
    }
    .into())
}

/// Derive the current state of `container` from the runtime.
///
/// # Errors
///
/// Returns an error only if the runtime CLI cannot be spawned.
pub async fn observe_state(engine: &impl ContainerEngine, container: &str) -> Result<ContainerState> {
    if is_running(engine, container).await? {
        return Ok(ContainerState::Running);
    }
    let output = engine
        .inspect_status(container)
        .await
        .with_context(|| format!("inspecting container {container}"))?;
    if !output.status.success() {
        return Ok(ContainerState::Absent);
    }
    let status = String::from_utf8_lossy(&output.stdout);
    let state = ContainerState::from_inspect_status(&status);
    // Listed as not running, so a stale "running" is treated as unreachable.
    Ok(match state {
        ContainerState::Running => ContainerState::Unreachable,
        other => other,
    })
}
