//! Post-start database reconfiguration: host-auth rule and reload.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{ContainerEngine, EventLog};
use crate::application::services::{failure_detail, logged};
use crate::domain::error::ProvisionError;
use crate::domain::hba::{DATA_DIR, HBA_FILE, REMOTE_PASSWORD_RULE, contains_rule};

/// Result of `append_host_auth_rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleChange {
    Appended,
    AlreadyPresent,
}

fn reconfig_failure(step: &str, result: Result<Output>) -> Result<Output> {
    let detail = match result {
        Ok(output) if output.status.success() => return Ok(output),
        Ok(output) => failure_detail(&output),
        Err(e) => format!("{e:#}"),
    };
    Err(ProvisionError::ReconfigurationFailed {
        detail: format!("{step}: {detail}"),
    }
    .into())
}

/// Allow password-authenticated connections from any IPv4 address.
///
/// The host-auth file is read first and the rule appended only when no
/// equivalent rule is present, so repeated runs leave one copy.
///
/// # Errors
///
/// Returns `ProvisionError::ReconfigurationFailed`; there is no retry.
pub async fn append_host_auth_rule(
    engine: &impl ContainerEngine,
    container: &str,
    log: &impl EventLog,
) -> Result<RuleChange> {
    let result = append_if_absent(engine, container).await;
    let change = logged(log, "failed to update host-based authentication", result)?;
    let message = match change {
        RuleChange::Appended => "appended host-auth rule",
        RuleChange::AlreadyPresent => "host-auth rule already present",
    };
    log.record(message, None);
    Ok(change)
}

async fn append_if_absent(engine: &impl ContainerEngine, container: &str) -> Result<RuleChange> {
    let current = reconfig_failure(
        "read pg_hba.conf",
        engine.exec(container, None, &["cat", HBA_FILE]).await,
    )?;
    if contains_rule(&String::from_utf8_lossy(&current.stdout), REMOTE_PASSWORD_RULE) {
        return Ok(RuleChange::AlreadyPresent);
    }
    let script = format!("printf '%s\\n' '{REMOTE_PASSWORD_RULE}' >> {HBA_FILE}");
    reconfig_failure(
        "append to pg_hba.conf",
        engine.exec(container, None, &["sh", "-c", &script]).await,
    )?;
    Ok(RuleChange::Appended)
}

/// Ask the running server to re-read its configuration files.
///
/// # Errors
///
/// Returns `ProvisionError::ReconfigurationFailed`; there is no retry.
pub async fn reload_configuration(
    engine: &impl ContainerEngine,
    container: &str,
    log: &impl EventLog,
) -> Result<()> {
    let result = reconfig_failure(
        "pg_ctl reload",
        engine
            .exec(container, Some("postgres"), &["pg_ctl", "reload", "-D", DATA_DIR])
            .await,
    );
    logged(log, "failed to reload database configuration", result)?;
    log.record("database configuration reloaded", None);
    Ok(())
}
