//! Prerequisite install use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{EventLog, HostPlatform, ProgressReporter};
use crate::application::services::logged;
use crate::domain::error::ProvisionError;
use crate::domain::{PackageManager, Tool};

/// Which tools were found and which had to be installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteReport {
    pub present: Vec<Tool>,
    pub installed: Vec<Tool>,
}

/// Make sure every tool in `Tool::ALL` is available, installing the missing
/// ones with `manager`.
///
/// Tools are handled in order and the first failed install aborts the rest.
///
/// # Errors
///
/// Returns `ProvisionError::InstallFailed` naming the tool and manager.
pub async fn ensure_prerequisites(
    host: &impl HostPlatform,
    manager: PackageManager,
    reporter: &impl ProgressReporter,
    log: &impl EventLog,
) -> Result<PrerequisiteReport> {
    let mut report = PrerequisiteReport::default();
    for tool in Tool::ALL {
        if host.tool_available(tool).await {
            tracing::debug!(%tool, "already installed");
            report.present.push(tool);
            continue;
        }

        reporter.step(&format!("installing {tool} with {manager}..."));
        let result = host.install(manager, tool).await.map_err(|e| {
            e.context(ProvisionError::InstallFailed {
                tool: tool.name().to_string(),
                manager: manager.id().to_string(),
            })
        });
        logged(log, &format!("failed to install {tool}"), result)?;

        log.record(&format!("installed {tool}"), None);
        reporter.success(&format!("{tool} installed"));
        report.installed.push(tool);
    }
    Ok(report)
}
