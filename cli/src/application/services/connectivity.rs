//! Liveness probe use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{DatabaseProbe, EventLog};
use crate::application::services::logged;
use crate::domain::ConnectionDescriptor;
use crate::domain::error::ProvisionError;

/// Connect to the database described by `target` and ping it once.
///
/// # Errors
///
/// Returns `ProvisionError::ConnectivityFailed` naming the target address.
pub async fn verify_connectivity(
    probe: &impl DatabaseProbe,
    target: &ConnectionDescriptor,
    log: &impl EventLog,
) -> Result<()> {
    let result: Result<()> = probe.ping(target).await.map_err(|e| {
        ProvisionError::ConnectivityFailed {
            target: target.target(),
            detail: format!("{e:#}"),
        }
        .into()
    });
    logged(log, "connectivity check failed", result)?;
    log.record(&format!("connected to {}", target.target()), None);
    Ok(())
}
