//! Infrastructure implementation of the `HostPlatform` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, HostPlatform};
use crate::domain::platform::{OS_RELEASE_PATH, install_commands};
use crate::domain::{PackageManager, Tool};
use crate::infra::command_runner::INSTALL_TIMEOUT;

/// Host adapter that runs version checks and package installs through a
/// `CommandRunner`.
pub struct HostSystem<R: CommandRunner> {
    runner: R,
    sudo: bool,
    os_release: PathBuf,
}

impl<R: CommandRunner> HostSystem<R> {
    pub fn new(runner: R, sudo: bool) -> Self {
        Self {
            runner,
            sudo,
            os_release: PathBuf::from(OS_RELEASE_PATH),
        }
    }

    /// Read the OS record from `path` instead of `/etc/os-release`.
    #[must_use]
    pub fn with_os_release(mut self, path: PathBuf) -> Self {
        self.os_release = path;
        self
    }
}

impl<R: CommandRunner> HostPlatform for HostSystem<R> {
    async fn read_os_release(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.os_release)
            .await
            .with_context(|| format!("reading {}", self.os_release.display()))
    }

    async fn tool_available(&self, tool: Tool) -> bool {
        let cmd = tool.version_command();
        match self.runner.run(&cmd.program, &cmd.arg_refs()).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                tracing::debug!(%tool, error = %e, "version check failed");
                false
            }
        }
    }

    async fn install(&self, manager: PackageManager, tool: Tool) -> Result<()> {
        for cmd in install_commands(manager, tool, self.sudo) {
            let output = self
                .runner
                .run_with_timeout(&cmd.program, &cmd.arg_refs(), INSTALL_TIMEOUT)
                .await
                .with_context(|| format!("running {cmd}"))?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                anyhow::bail!("{cmd} failed: {}", stderr.trim());
            }
        }
        Ok(())
    }
}
