//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::process`.
//! All functions are synchronous and take data in, returning data out.

pub mod certs;
pub mod command;
pub mod config;
pub mod connection;
pub mod container;
pub mod error;
pub mod hba;
pub mod log;
pub mod manifest;
pub mod platform;
pub mod profile;
pub mod readiness;

pub use command::CommandLine;
pub use config::{PgstrapConfig, validate_config_key, validate_config_value};
pub use connection::{ConnectionDescriptor, ProbeTarget};
pub use container::ContainerState;
pub use error::{ConfigError, ProvisionError};
pub use platform::{PackageManager, PlatformFamily, Tool};
pub use profile::{EnvironmentProfile, ProfileFields, SslMode, Subnet};
pub use readiness::ReadinessPolicy;
