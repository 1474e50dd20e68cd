//! Application service: idempotent provisioning orchestrator.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The environment file is the only idempotency marker. When it is absent
//! the full pipeline runs in strict sequence and the first failure aborts
//! it, leaving completed side effects in place. When it is present only the
//! connectivity probe runs.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ContainerEngine, DatabaseProbe, EventLog, HostPlatform, ProfilePrompter, ProgressReporter,
    WorkspaceStore,
};
use crate::application::services::{
    config_writer, connectivity, container, logged, platform, prerequisites, reconfigure,
};
use crate::application::services::prerequisites::PrerequisiteReport;
use crate::application::services::reconfigure::RuleChange;
use crate::domain::error::ProvisionError;
use crate::domain::{
    ConnectionDescriptor, EnvironmentProfile, PgstrapConfig, PlatformFamily,
};

/// Orchestrator state. `Ready` is reached only through a passing probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unconfigured,
    Provisioning,
    Ready,
}

/// Outcome of the `provision` use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The full pipeline ran on a machine without an environment file.
    Provisioned {
        family: PlatformFamily,
        prerequisites: PrerequisiteReport,
        observations: u32,
        rule: RuleChange,
    },
    /// An environment file was found; only the probe ran.
    AlreadyConfigured,
}

/// Per-run inputs that are not ports.
pub struct ProvisionOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub settings: &'a PgstrapConfig,
    pub cancel: &'a CancellationToken,
}

/// Stop before `stage` once an interrupt has been requested.
fn checkpoint(cancel: &CancellationToken, stage: &str, log: &impl EventLog) -> Result<()> {
    if !cancel.is_cancelled() {
        return Ok(());
    }
    let err = ProvisionError::Cancelled {
        stage: stage.to_string(),
    };
    logged(log, "provisioning interrupted", Err(err.into()))
}

fn enter(state: PipelineState, log: &impl EventLog) {
    tracing::info!(?state, "pipeline state");
    log.record(&format!("pipeline state {state:?}"), None);
}

/// Provision the database environment, or verify an existing one.
///
/// # Errors
///
/// Returns the first stage failure as a `ProvisionError` wrapped in
/// `anyhow::Error`. Later stages never run after an earlier one fails.
pub async fn provision(
    host: &impl HostPlatform,
    engine: &impl ContainerEngine,
    store: &impl WorkspaceStore,
    probe: &impl DatabaseProbe,
    prompter: &impl ProfilePrompter,
    log: &impl EventLog,
    opts: ProvisionOptions<'_, impl ProgressReporter>,
) -> Result<Outcome> {
    let ProvisionOptions {
        reporter,
        settings,
        cancel,
    } = opts;

    if store.profile_exists().await {
        reporter.step("environment already configured, verifying connectivity...");
        let profile = config_writer::load_profile(store, log).await?;
        verify(probe, &profile, settings, reporter, log).await?;
        enter(PipelineState::Ready, log);
        return Ok(Outcome::AlreadyConfigured);
    }
    enter(PipelineState::Unconfigured, log);

    // 1. Platform.
    reporter.step("detecting platform...");
    let family = platform::detect_platform(host, log).await?;
    reporter.success(&format!("platform: {family}"));
    enter(PipelineState::Provisioning, log);

    // 2. Environment profile.
    let fields = logged(log, "failed to collect settings", prompter.collect_fields())?;
    let profile = logged(
        log,
        "collected settings are invalid",
        EnvironmentProfile::from_fields(&fields, family.package_manager(), store.root_dir())
            .map_err(anyhow::Error::from),
    )?;
    checkpoint(cancel, "writing the environment file", log)?;
    config_writer::write_profile(store, &profile, log).await?;
    reporter.success("environment file written");

    // 3. Compose manifest.
    let manifest =
        config_writer::write_manifest(store, &profile, &settings.manifest_options(), log).await?;
    reporter.success("compose manifest written");

    // 4. Prerequisites.
    checkpoint(cancel, "installing prerequisites", log)?;
    reporter.step("checking prerequisites...");
    let report =
        prerequisites::ensure_prerequisites(host, family.package_manager(), reporter, log).await?;
    reporter.success("prerequisites satisfied");

    // 5-7. Runtime, compose, readiness.
    checkpoint(cancel, "starting the container runtime", log)?;
    reporter.step("starting container runtime...");
    container::start_runtime(engine, log).await?;
    checkpoint(cancel, "starting the database container", log)?;
    reporter.step("starting database container...");
    container::compose_up(engine, &manifest, log).await?;
    let name = settings.runtime.container_name.as_str();
    let observations = container::wait_running(
        engine,
        name,
        &settings.readiness_policy(),
        cancel,
        reporter,
        log,
    )
    .await?;
    reporter.success(&format!("container {name} is running"));

    // 8-9. Reconfigure.
    checkpoint(cancel, "configuring the database", log)?;
    reporter.step("configuring host-based authentication...");
    let rule = reconfigure::append_host_auth_rule(engine, name, log).await?;
    reconfigure::reload_configuration(engine, name, log).await?;
    reporter.success("database configuration reloaded");

    checkpoint(cancel, "verifying connectivity", log)?;
    verify(probe, &profile, settings, reporter, log).await?;
    enter(PipelineState::Ready, log);

    Ok(Outcome::Provisioned {
        family,
        prerequisites: report,
        observations,
        rule,
    })
}

async fn verify(
    probe: &impl DatabaseProbe,
    profile: &EnvironmentProfile,
    settings: &PgstrapConfig,
    reporter: &impl ProgressReporter,
    log: &impl EventLog,
) -> Result<()> {
    let target = ConnectionDescriptor::from_profile(profile, settings.probe.target);
    reporter.step(&format!("connecting to {}...", target.target()));
    connectivity::verify_connectivity(probe, &target, log).await?;
    reporter.success(&format!("database reachable at {}", target.target()));
    Ok(())
}
