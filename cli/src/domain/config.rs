//! Domain types and validators for pgstrap's own configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::connection::ProbeTarget;
use crate::domain::error::ConfigError;
use crate::domain::manifest::ManifestOptions;
use crate::domain::readiness::ReadinessPolicy;

// ── Constants ────────────────────────────────────────────────────────────────

/// Settings file name, relative to the working directory.
pub const CONFIG_FILE: &str = "pgstrap.yaml";

/// Log artifact name, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "pgstrap.log";

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "readiness.max_attempts",
    "readiness.initial_delay_secs",
    "readiness.max_delay_secs",
    "readiness.max_wait_secs",
    "runtime.use_sudo",
    "runtime.image",
    "runtime.container_name",
    "probe.target",
    "probe.timeout_secs",
    "log_file",
];

const BOOL_VALUES: &[&str] = &["true", "false"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `pgstrap.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PgstrapConfig {
    pub readiness: ReadinessConfig,
    pub runtime: RuntimeConfig,
    pub probe: ProbeConfig,
    /// Log artifact path, relative to the working directory unless absolute.
    pub log_file: String,
}

impl Default for PgstrapConfig {
    fn default() -> Self {
        Self {
            readiness: ReadinessConfig::default(),
            runtime: RuntimeConfig::default(),
            probe: ProbeConfig::default(),
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

/// Container readiness poll settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    pub max_attempts: u32,
    pub initial_delay_secs: u64,
    pub max_delay_secs: u64,
    pub max_wait_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        let policy = ReadinessPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_delay_secs: policy.initial_delay.as_secs(),
            max_delay_secs: policy.max_delay.as_secs(),
            max_wait_secs: policy.max_wait.as_secs(),
        }
    }
}

/// Container runtime settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Prefix privileged commands (package installs, systemctl, docker) with `sudo`.
    pub use_sudo: bool,
    pub image: String,
    pub container_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            use_sudo: true,
            image: "postgres:16".to_string(),
            container_name: "pgstrap_postgres".to_string(),
        }
    }
}

/// Liveness probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub target: ProbeTarget,
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target: ProbeTarget::default(),
            timeout_secs: 10,
        }
    }
}

impl PgstrapConfig {
    #[must_use]
    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            max_attempts: self.readiness.max_attempts,
            initial_delay: Duration::from_secs(self.readiness.initial_delay_secs),
            max_delay: Duration::from_secs(self.readiness.max_delay_secs),
            max_wait: Duration::from_secs(self.readiness.max_wait_secs),
        }
    }

    #[must_use]
    pub fn manifest_options(&self) -> ManifestOptions {
        ManifestOptions {
            image: self.runtime.image.clone(),
            container_name: self.runtime.container_name.clone(),
        }
    }

    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe.timeout_secs)
    }

    /// Read a single setting by dotted key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a known setting.
    pub fn get(&self, key: &str) -> Result<String> {
        validate_config_key(key)?;
        Ok(match key {
            "readiness.max_attempts" => self.readiness.max_attempts.to_string(),
            "readiness.initial_delay_secs" => self.readiness.initial_delay_secs.to_string(),
            "readiness.max_delay_secs" => self.readiness.max_delay_secs.to_string(),
            "readiness.max_wait_secs" => self.readiness.max_wait_secs.to_string(),
            "runtime.use_sudo" => self.runtime.use_sudo.to_string(),
            "runtime.image" => self.runtime.image.clone(),
            "runtime.container_name" => self.runtime.container_name.clone(),
            "probe.target" => self.probe.target.as_str().to_string(),
            "probe.timeout_secs" => self.probe.timeout_secs.to_string(),
            _ => self.log_file.clone(),
        })
    }

    /// Apply a validated `key = value` assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "readiness.max_attempts" => self.readiness.max_attempts = parse_num(key, value)?,
            "readiness.initial_delay_secs" => {
                self.readiness.initial_delay_secs = parse_num(key, value)?;
            }
            "readiness.max_delay_secs" => self.readiness.max_delay_secs = parse_num(key, value)?,
            "readiness.max_wait_secs" => self.readiness.max_wait_secs = parse_num(key, value)?,
            "runtime.use_sudo" => self.runtime.use_sudo = value == "true",
            "runtime.image" => self.runtime.image = value.to_string(),
            "runtime.container_name" => self.runtime.container_name = value.to_string(),
            "probe.target" => {
                self.probe.target = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            }
            "probe.timeout_secs" => self.probe.timeout_secs = parse_num(key, value)?,
            _ => self.log_file = value.to_string(),
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: "a non-negative integer".to_string(),
        }
        .into()
    })
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |valid: &str| -> Result<()> {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: valid.to_string(),
        }
        .into())
    };
    match key {
        "runtime.use_sudo" if !BOOL_VALUES.contains(&value) => invalid(&BOOL_VALUES.join(", ")),
        "probe.target" if !ProbeTarget::VALUES.contains(&value) => {
            invalid(&ProbeTarget::VALUES.join(", "))
        }
        "readiness.max_attempts" if value.parse::<u32>().map_or(true, |n| n == 0) => {
            invalid("a positive integer")
        }
        "runtime.image" | "runtime.container_name" | "log_file" if value.trim().is_empty() => {
            invalid("a non-empty string")
        }
        _ => Ok(()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
