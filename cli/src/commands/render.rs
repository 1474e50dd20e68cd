//! `pgstrap render`: regenerate the compose manifest from `.env`.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::config_writer::{load_profile, write_manifest};
use crate::output::json;

/// Run the render command.
///
/// # Errors
///
/// Returns an error if the environment file is invalid or the manifest
/// cannot be written.
pub async fn run(app: &AppContext) -> Result<()> {
    let store = app.workspace();
    let log = app.event_log();
    let profile = load_profile(&store, &log).await?;
    let path = write_manifest(&store, &profile, &app.settings.manifest_options(), &log).await?;

    if app.is_json() {
        return json::print(&serde_json::json!({ "manifest": path.display().to_string() }));
    }
    app.output.success(&format!("wrote {}", path.display()));
    Ok(())
}
