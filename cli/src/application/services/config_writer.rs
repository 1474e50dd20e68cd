//! Environment profile and compose manifest persistence.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{EventLog, WorkspaceStore};
use crate::application::services::logged;
use crate::domain::EnvironmentProfile;
use crate::domain::manifest::{ManifestOptions, render_manifest};

/// Create the environment file from `profile`. Never overwrites.
///
/// # Errors
///
/// Returns `ProvisionError::ProfileAlreadyExists` when the file is present,
/// or an I/O error if it cannot be created.
pub async fn write_profile(
    store: &impl WorkspaceStore,
    profile: &EnvironmentProfile,
    log: &impl EventLog,
) -> Result<()> {
    let result = store.create_profile(profile).await;
    logged(log, "failed to write environment file", result)?;
    log.record(
        &format!("wrote environment file {}", store.profile_path().display()),
        None,
    );
    Ok(())
}

/// Read and validate the existing environment file.
///
/// # Errors
///
/// Returns `ProvisionError::ProfileInvalid` if the file is malformed.
pub async fn load_profile(
    store: &impl WorkspaceStore,
    log: &impl EventLog,
) -> Result<EnvironmentProfile> {
    let result = store.load_profile().await;
    logged(log, "failed to load environment file", result)
}

/// Render the manifest for `profile`, replace the file atomically, and
/// prepare the bind-mounted server config directory.
///
/// # Errors
///
/// Returns an error if the manifest or the mount directory cannot be written.
pub async fn write_manifest(
    store: &impl WorkspaceStore,
    profile: &EnvironmentProfile,
    opts: &ManifestOptions,
    log: &impl EventLog,
) -> Result<PathBuf> {
    let text = render_manifest(profile, opts);
    let result = async {
        let path = store
            .write_manifest(&text)
            .await
            .context("writing compose manifest")?;
        let seeded = store
            .prepare_mounts(profile)
            .await
            .context("preparing server config mount")?;
        Ok::<_, anyhow::Error>((path, seeded))
    }
    .await;
    let (path, seeded) = logged(log, "failed to write compose manifest", result)?;
    if seeded {
        tracing::debug!("seeded host-auth file");
    }
    log.record(&format!("wrote compose manifest {}", path.display()), None);
    Ok(path)
}
