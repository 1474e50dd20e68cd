//! Platform detection use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{EventLog, HostPlatform};
use crate::application::services::logged;
use crate::domain::PlatformFamily;
use crate::domain::error::ProvisionError;
use crate::domain::platform::{OS_RELEASE_PATH, detect_family};

/// Identify the host's package-management family.
///
/// # Errors
///
/// Returns `ProvisionError::PlatformUnsupported` when the OS record is
/// unreadable, has no `ID=`, or names an unrecognized distribution.
pub async fn detect_platform(
    host: &impl HostPlatform,
    log: &impl EventLog,
) -> Result<PlatformFamily> {
    let result = identify(host).await;
    let family = logged(log, "platform detection failed", result)?;
    tracing::info!(family = family.label(), "detected platform");
    log.record(&format!("detected platform {}", family.label()), None);
    Ok(family)
}

async fn identify(host: &impl HostPlatform) -> Result<PlatformFamily> {
    let content = host
        .read_os_release()
        .await
        .map_err(|e| ProvisionError::PlatformUnsupported {
            reason: format!("cannot read {OS_RELEASE_PATH}: {e}"),
        })?;
    Ok(detect_family(&content)?)
}
