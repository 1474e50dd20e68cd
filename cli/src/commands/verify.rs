//! `pgstrap verify`: connect to the configured database once.

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::config_writer::load_profile;
use crate::application::services::connectivity::verify_connectivity;
use crate::domain::ConnectionDescriptor;
use crate::output::json;

#[derive(Serialize)]
struct VerifyReport {
    reachable: bool,
    target: String,
}

/// Run the verify command.
///
/// # Errors
///
/// Returns `ProvisionError::ProfileInvalid` when the environment file is
/// missing or malformed, or `ProvisionError::ConnectivityFailed`.
pub async fn run(app: &AppContext) -> Result<()> {
    let store = app.workspace();
    let log = app.event_log();
    let profile = load_profile(&store, &log).await?;
    let descriptor = ConnectionDescriptor::from_profile(&profile, app.settings.probe.target);
    let target = descriptor.target();

    let spinner = app.output.spinner(&format!("connecting to {target}..."));
    let result = verify_connectivity(&app.probe(), &descriptor, &log).await;
    if let Some(spinner) = &spinner {
        match &result {
            Ok(()) => spinner.finish_ok(&format!("connected to {target}")),
            Err(_) => spinner.finish_error(&format!("cannot reach {target}")),
        }
    }
    result?;

    if app.is_json() {
        return json::print(&VerifyReport {
            reachable: true,
            target,
        });
    }
    if spinner.is_none() {
        app.output.success(&format!("connected to {target}"));
    }
    Ok(())
}
