//! Connection descriptor for the liveness probe.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::manifest::CONTAINER_PORT;
use crate::domain::profile::{EnvironmentProfile, SslMode};

/// Which address the probe dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeTarget {
    /// `127.0.0.1` on the published host port.
    #[default]
    Published,
    /// The container's own address on the in-container port.
    Container,
}

impl ProbeTarget {
    pub const VALUES: &'static [&'static str] = &["published", "container"];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Published => "published",
            Self::Container => "container",
        }
    }
}

impl FromStr for ProbeTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(Self::Published),
            "container" => Ok(Self::Container),
            other => Err(format!("unknown probe target '{other}'")),
        }
    }
}

/// Everything needed to open one client connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: SslMode,
    /// Root certificate for the verifying SSL modes.
    pub ssl_root_cert: Option<PathBuf>,
}

impl ConnectionDescriptor {
    #[must_use]
    pub fn from_profile(profile: &EnvironmentProfile, target: ProbeTarget) -> Self {
        let (host, port) = match target {
            ProbeTarget::Published => ("127.0.0.1".to_string(), profile.port),
            ProbeTarget::Container => (profile.docker_ip.to_string(), CONTAINER_PORT),
        };
        // The self-signed server certificate doubles as its own root.
        let ssl_root_cert = profile
            .ssl_mode
            .verifies()
            .then(|| profile.ssl_cert_path());
        Self {
            host,
            port,
            user: profile.user.clone(),
            password: profile.password.clone(),
            database: profile.db_name.clone(),
            ssl_mode: profile.ssl_mode,
            ssl_root_cert,
        }
    }

    /// `host:port` for messages.
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("ssl_root_cert", &self.ssl_root_cert)
            .finish()
    }
}
