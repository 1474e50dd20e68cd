//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers that need to branch on the failure kind
//! recover it with `anyhow::Error::downcast_ref::<ProvisionError>()`.

use thiserror::Error;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Failure taxonomy of the provisioning pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("Unsupported platform: {reason}")]
    PlatformUnsupported { reason: String },

    #[error("Environment file already exists at {path}. Refusing to overwrite it.")]
    ProfileAlreadyExists { path: String },

    #[error("Environment file is invalid: {reason}")]
    ProfileInvalid { reason: String },

    #[error("Failed to install {tool} with {manager}.")]
    InstallFailed { tool: String, manager: String },

    #[error("Container runtime failed to start: {detail}")]
    RuntimeStartFailed { detail: String },

    #[error("Container '{container}' is not running after {attempts} check(s).")]
    ContainerNotRunning { container: String, attempts: u32 },

    #[error("Interrupted while {stage}.")]
    Cancelled { stage: String },

    #[error("Failed to reconfigure the database: {detail}")]
    ReconfigurationFailed { detail: String },

    #[error("Cannot connect to the database at {target}: {detail}")]
    ConnectivityFailed { target: String, detail: String },
}

impl ProvisionError {
    /// Stable machine-readable identifier for `--json` output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PlatformUnsupported { .. } => "PLATFORM_UNSUPPORTED",
            Self::ProfileAlreadyExists { .. } => "PROFILE_ALREADY_EXISTS",
            Self::ProfileInvalid { .. } => "PROFILE_INVALID",
            Self::InstallFailed { .. } => "INSTALL_FAILED",
            Self::RuntimeStartFailed { .. } => "RUNTIME_START_FAILED",
            Self::ContainerNotRunning { .. } => "CONTAINER_NOT_RUNNING",
            Self::Cancelled { .. } => "CANCELLED",
            Self::ReconfigurationFailed { .. } => "RECONFIGURATION_FAILED",
            Self::ConnectivityFailed { .. } => "CONNECTIVITY_FAILED",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
