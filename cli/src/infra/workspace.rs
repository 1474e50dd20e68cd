//! Infrastructure implementation of the `WorkspaceStore` port.
//!
//! `FileWorkspace` owns every file under the working directory. Blocking
//! filesystem work runs on `tokio::task::spawn_blocking`.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::WorkspaceStore;
use crate::domain::certs::OPENSSL_CONFIG;
use crate::domain::error::ProvisionError;
use crate::domain::hba::SEED_HBA;
use crate::domain::manifest::{MANIFEST_FILE, mounts_dir};
use crate::domain::profile::PROFILE_FILE;
use crate::domain::EnvironmentProfile;

/// Working-directory file store.
#[derive(Debug, Clone)]
pub struct FileWorkspace {
    root: PathBuf,
}

impl FileWorkspace {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn create_profile_sync(path: &Path, content: &str) -> Result<()> {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = match options.open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(ProvisionError::ProfileAlreadyExists {
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("creating {}", path.display()));
            }
        };
        file.write_all(content.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?;
        file.sync_all()
            .with_context(|| format!("syncing {}", path.display()))
    }

    fn load_profile_sync(path: &Path, root: &Path) -> Result<EnvironmentProfile> {
        let invalid = |reason: String| ProvisionError::ProfileInvalid { reason };
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| invalid(format!("cannot read {}: {e}", path.display())))?;
        let entries = iter
            .collect::<std::result::Result<Vec<(String, String)>, _>>()
            .map_err(|e| invalid(format!("cannot parse {}: {e}", path.display())))?;
        Ok(EnvironmentProfile::from_entries(entries, root)?)
    }

    fn write_manifest_sync(path: &Path, text: &str) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("manifest path has no parent"))?;
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        // NamedTempFile is created 0600 on unix; the rename keeps the mode.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(text.as_bytes())
            .context("writing manifest temp file")?;
        tmp.as_file().sync_all().context("syncing manifest temp file")?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("finalizing {}", path.display()))?;
        Ok(())
    }

    fn prepare_mounts_sync(dir: &Path) -> Result<bool> {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let hba = dir.join("pg_hba.conf");
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // Read by the server's own user inside the container.
            options.mode(0o644);
        }
        match options.open(&hba) {
            Ok(mut file) => {
                file.write_all(SEED_HBA.as_bytes())
                    .with_context(|| format!("writing {}", hba.display()))?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e).with_context(|| format!("creating {}", hba.display())),
        }
    }

    fn write_openssl_config_sync(root: &Path, text: &str) -> Result<PathBuf> {
        let private = root.join(".certs").join("private");
        std::fs::create_dir_all(&private)
            .with_context(|| format!("creating {}", private.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&private, std::fs::Permissions::from_mode(0o700))
                .with_context(|| format!("setting permissions on {}", private.display()))?;
        }
        let path = root.join(OPENSSL_CONFIG);
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

impl WorkspaceStore for FileWorkspace {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    async fn profile_exists(&self) -> bool {
        tokio::fs::try_exists(self.profile_path())
            .await
            .unwrap_or(false)
    }

    async fn create_profile(&self, profile: &EnvironmentProfile) -> Result<()> {
        let path = self.profile_path();
        let content = profile.to_env_string();
        tokio::task::spawn_blocking(move || Self::create_profile_sync(&path, &content))
            .await
            .context("profile write task panicked")?
    }

    async fn load_profile(&self) -> Result<EnvironmentProfile> {
        let path = self.profile_path();
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::load_profile_sync(&path, &root))
            .await
            .context("profile load task panicked")?
    }

    async fn write_manifest(&self, text: &str) -> Result<PathBuf> {
        let path = self.manifest_path();
        let text = text.to_string();
        let target = path.clone();
        tokio::task::spawn_blocking(move || Self::write_manifest_sync(&target, &text))
            .await
            .context("manifest write task panicked")??;
        Ok(path)
    }

    async fn prepare_mounts(&self, profile: &EnvironmentProfile) -> Result<bool> {
        let dir = mounts_dir(profile);
        tokio::task::spawn_blocking(move || Self::prepare_mounts_sync(&dir))
            .await
            .context("mount preparation task panicked")?
    }

    async fn write_openssl_config(&self, text: &str) -> Result<PathBuf> {
        let root = self.root.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || Self::write_openssl_config_sync(&root, &text))
            .await
            .context("openssl config task panicked")?
    }
}
