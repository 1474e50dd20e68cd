//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::certs::CertificateSubject;
use crate::domain::{
    ConnectionDescriptor, EnvironmentProfile, PackageManager, PgstrapConfig, ProfileFields, Tool,
};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Event Log Port ────────────────────────────────────────────────────────────

/// Append-only log artifact.
///
/// Recording never fails from the caller's point of view: a log that cannot
/// be written must not mask the error being logged.
pub trait EventLog {
    /// Append one `(message, optional error)` record.
    fn record(&self, message: &str, error: Option<&anyhow::Error>);
}

// ── Host Ports ────────────────────────────────────────────────────────────────

/// The host operating system: identification and package installs.
#[allow(async_fn_in_trait)]
pub trait HostPlatform {
    /// Raw contents of the OS identification record.
    async fn read_os_release(&self) -> Result<String>;
    /// Whether `tool` answers its version invocation.
    async fn tool_available(&self, tool: Tool) -> bool;
    /// Install `tool` with `manager`, blocking until the manager exits.
    ///
    /// # Errors
    ///
    /// Returns an error if any install command fails to spawn or exits non-zero.
    async fn install(&self, manager: PackageManager, tool: Tool) -> Result<()>;
}

/// Container runtime CLI.
///
/// Commands returning `Output` leave exit-status interpretation to the
/// caller; the rest map a non-zero exit to an error themselves.
#[allow(async_fn_in_trait)]
pub trait ContainerEngine {
    /// Enable the runtime's system service.
    async fn enable_service(&self) -> Result<Output>;
    /// Start the runtime's system service.
    async fn start_service(&self) -> Result<Output>;
    /// `compose -f <manifest> up -d`.
    async fn compose_up(&self, manifest: &Path) -> Result<Output>;
    /// IDs of running containers whose name matches `name`.
    async fn list_running(&self, name: &str) -> Result<Output>;
    /// `inspect` status of the named container.
    async fn inspect_status(&self, name: &str) -> Result<Output>;
    /// Run `args` inside `container`, optionally as `user`.
    async fn exec(&self, container: &str, user: Option<&str>, args: &[&str]) -> Result<Output>;
}

// ── Workspace Port ────────────────────────────────────────────────────────────

/// Files owned by the working directory: environment profile, compose
/// manifest, bind-mounted server config, and certificate material.
#[allow(async_fn_in_trait)]
pub trait WorkspaceStore {
    /// The working directory every relative path resolves against.
    fn root_dir(&self) -> &Path;
    /// Absolute path of the environment file.
    fn profile_path(&self) -> PathBuf;
    /// Absolute path of the compose manifest.
    fn manifest_path(&self) -> PathBuf;
    /// Whether the environment file exists.
    async fn profile_exists(&self) -> bool;
    /// Create the environment file. Never overwrites.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::ProfileAlreadyExists` if the file is present.
    async fn create_profile(&self, profile: &EnvironmentProfile) -> Result<()>;
    /// Read and validate the environment file.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::ProfileInvalid` if the file cannot be parsed
    /// or fails validation.
    async fn load_profile(&self) -> Result<EnvironmentProfile>;
    /// Atomically replace the manifest with `text`.
    async fn write_manifest(&self, text: &str) -> Result<PathBuf>;
    /// Create the bind-mount directory and seed the host-auth file if absent.
    /// Returns `true` when the file was seeded.
    async fn prepare_mounts(&self, profile: &EnvironmentProfile) -> Result<bool>;
    /// Write the OpenSSL request config and create the certificate dirs.
    async fn write_openssl_config(&self, text: &str) -> Result<PathBuf>;
}

// ── Certificate Port ──────────────────────────────────────────────────────────

/// External certificate tooling.
#[allow(async_fn_in_trait)]
pub trait CertificateTool {
    /// Generate an RSA private key of `bits` at `key`.
    async fn generate_key(&self, key: &Path, bits: u32) -> Result<()>;
    /// Create a signing request for `key` using `config`.
    async fn create_request(&self, key: &Path, config: &Path, csr: &Path) -> Result<()>;
    /// Self-sign `csr` with `key`, valid for `days`.
    async fn self_sign(
        &self,
        csr: &Path,
        key: &Path,
        config: &Path,
        days: u32,
        cert: &Path,
    ) -> Result<()>;
}

// ── Database Probe Port ───────────────────────────────────────────────────────

/// Single connect-and-ping against a database.
#[allow(async_fn_in_trait)]
pub trait DatabaseProbe {
    /// Open one connection, ping it, and close it.
    async fn ping(&self, target: &ConnectionDescriptor) -> Result<()>;
}

// ── Prompt Port ───────────────────────────────────────────────────────────────

/// Source of the values a fresh profile is built from.
pub trait ProfilePrompter {
    /// Collect the profile fields.
    fn collect_fields(&self) -> Result<ProfileFields>;
    /// Collect the certificate subject, defaulting the common name.
    fn collect_subject(&self, default_cn: &str) -> Result<CertificateSubject>;
}

// ── Settings Port ─────────────────────────────────────────────────────────────

/// Persistence of pgstrap's own settings.
pub trait SettingsStore {
    /// Load settings, falling back to defaults when the file is absent.
    fn load(&self) -> Result<PgstrapConfig>;
    /// Persist settings.
    fn save(&self, config: &PgstrapConfig) -> Result<()>;
    /// Location of the settings file.
    fn path(&self) -> &Path;
}
