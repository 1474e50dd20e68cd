//! `pgstrap status`: report what exists in the working directory and the
//! state of the database container.

use anyhow::Result;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::WorkspaceStore;
use crate::application::services::container::observe_state;
use crate::domain::{ConnectionDescriptor, ContainerState};
use crate::output::json;

#[derive(Serialize)]
struct StatusReport {
    root: String,
    profile: bool,
    manifest: bool,
    container: String,
    state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if the environment file exists but is invalid.
pub async fn run(app: &AppContext) -> Result<()> {
    let store = app.workspace();
    let profile = if store.profile_exists().await {
        Some(store.load_profile().await?)
    } else {
        None
    };
    let manifest = store.manifest_path().is_file();
    let container = app.settings.runtime.container_name.clone();

    // A missing runtime CLI is reported, not fatal.
    let state = match observe_state(&app.docker(), &container).await {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::debug!("container state unavailable: {e:#}");
            None
        }
    };
    let target = profile
        .as_ref()
        .map(|p| ConnectionDescriptor::from_profile(p, app.settings.probe.target).target());

    let report = StatusReport {
        root: store.root_dir().display().to_string(),
        profile: profile.is_some(),
        manifest,
        container,
        state: state.map_or("unknown", ContainerState::as_str).to_string(),
        target,
    };
    if app.is_json() {
        return json::print(&report);
    }

    let yes_no = |b: bool| if b { "present" } else { "missing" };
    app.output.header("pgstrap status");
    app.output.kv("directory", &report.root);
    app.output.kv("environment", yes_no(report.profile));
    app.output.kv("manifest", yes_no(report.manifest));
    match state {
        Some(state) => app.output.state("container", &report.container, state),
        None => app
            .output
            .kv("container", &format!("{} (unknown)", report.container)),
    }
    if let Some(target) = &report.target {
        app.output.kv("database", target);
    }
    Ok(())
}
