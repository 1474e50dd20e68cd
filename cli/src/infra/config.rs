//! Infrastructure implementation of the `SettingsStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;
use crate::domain::config::{CONFIG_FILE, PgstrapConfig};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "PGSTRAP_CONFIG";

/// Production implementation of `SettingsStore` that uses a YAML file on disk.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    /// Settings at `$PGSTRAP_CONFIG`, or `pgstrap.yaml` under `root`.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map_or_else(|| root.join(CONFIG_FILE), PathBuf::from);
        Self { path }
    }

    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for YamlConfigStore {
    fn load(&self) -> Result<PgstrapConfig> {
        let path = &self.path;
        if !path.exists() {
            return Ok(PgstrapConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &PgstrapConfig) -> Result<()> {
        let path = &self.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
