//! Environment profile: the durable record of every provisioning setting.
//!
//! The profile is persisted as `KEY=value` lines. This module owns the key
//! names, validation, and the serialized form; reading and writing the file
//! is the infra layer's job.

use std::fmt;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::domain::error::ProvisionError;
use crate::domain::platform::PackageManager;

/// Environment file name, relative to the working directory.
pub const PROFILE_FILE: &str = ".env";

/// Default server certificate path, relative to the working directory.
pub const DEFAULT_SSL_CERT: &str = ".certs/server.crt";

/// Default server private key path, relative to the working directory.
pub const DEFAULT_SSL_KEY: &str = ".certs/private/server.key";

/// Exact key names in the environment file.
pub mod keys {
    pub const OS: &str = "OS";
    pub const ROOT_DIR: &str = "ROOT_DIR";
    pub const DOCKER_IP: &str = "DOCKER_IP";
    pub const POST_USER: &str = "POST_USER";
    pub const POST_PASSWORD: &str = "POST_PASSWORD";
    pub const PG_PORT: &str = "PG_PORT";
    pub const DBNAME: &str = "DBNAME";
    pub const SUBNET: &str = "SUBNET";
    pub const SSL_MODE: &str = "SSL_MODE";
    pub const SSL_CERT: &str = "SSL_CERT";
    pub const SSL_KEY: &str = "SSL_KEY";
}

/// Keys that must be present in every profile.
pub const REQUIRED_KEYS: &[&str] = &[
    keys::DOCKER_IP,
    keys::POST_USER,
    keys::POST_PASSWORD,
    keys::PG_PORT,
    keys::DBNAME,
];

// ── Subnet ───────────────────────────────────────────────────────────────────

/// IPv4 network in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    pub network: Ipv4Addr,
    pub prefix: u8,
}

impl Subnet {
    /// The /24 that contains `ip`.
    #[must_use]
    pub fn slash24_of(ip: Ipv4Addr) -> Self {
        let [a, b, c, _] = ip.octets();
        Self {
            network: Ipv4Addr::new(a, b, c, 0),
            prefix: 24,
        }
    }

    fn mask(self) -> u32 {
        if self.prefix == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(self.prefix))
        }
    }

    #[must_use]
    pub fn contains(self, ip: Ipv4Addr) -> bool {
        let mask = self.mask();
        u32::from(ip) & mask == u32::from(self.network) & mask
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("subnet '{s}' must be in CIDR form, e.g. 192.168.100.0/24"))?;
        let network: Ipv4Addr = addr
            .parse()
            .map_err(|_| format!("subnet '{s}' has an invalid address"))?;
        let prefix: u8 = prefix
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| format!("subnet '{s}' has an invalid prefix length"))?;
        Ok(Self { network, prefix })
    }
}

// ── SSL mode ─────────────────────────────────────────────────────────────────

/// libpq-style client TLS mode used by the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
            Self::VerifyCa => "verify-ca",
            Self::VerifyFull => "verify-full",
        }
    }

    /// Whether the mode validates the server certificate against a root.
    #[must_use]
    pub fn verifies(self) -> bool {
        matches!(self, Self::VerifyCa | Self::VerifyFull)
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            other => Err(format!("unknown SSL mode '{other}'")),
        }
    }
}

// ── Collected input ──────────────────────────────────────────────────────────

/// Raw values gathered from the user before validation.
#[derive(Clone, Default)]
pub struct ProfileFields {
    pub docker_ip: String,
    pub user: String,
    pub password: String,
    pub port: String,
    pub db_name: String,
    /// Derived from `docker_ip` as its /24 when absent.
    pub subnet: Option<String>,
}

impl fmt::Debug for ProfileFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileFields")
            .field("docker_ip", &self.docker_ip)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("subnet", &self.subnet)
            .finish()
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

/// Validated environment profile.
#[derive(Clone, PartialEq, Eq)]
pub struct EnvironmentProfile {
    pub package_manager: Option<PackageManager>,
    pub root_dir: PathBuf,
    pub docker_ip: Ipv4Addr,
    pub user: String,
    pub password: String,
    pub port: u16,
    pub db_name: String,
    pub subnet: Subnet,
    pub ssl_mode: SslMode,
    pub ssl_cert: String,
    pub ssl_key: String,
}

impl fmt::Debug for EnvironmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentProfile")
            .field("package_manager", &self.package_manager)
            .field("root_dir", &self.root_dir)
            .field("docker_ip", &self.docker_ip)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("subnet", &self.subnet)
            .field("ssl_mode", &self.ssl_mode)
            .finish_non_exhaustive()
    }
}

fn invalid(reason: impl Into<String>) -> ProvisionError {
    ProvisionError::ProfileInvalid {
        reason: reason.into(),
    }
}

fn parse_ip(value: &str) -> Result<Ipv4Addr, ProvisionError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("{} '{value}' is not an IPv4 address", keys::DOCKER_IP)))
}

fn parse_port(value: &str) -> Result<u16, ProvisionError> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|p| *p != 0)
        .ok_or_else(|| invalid(format!("{} '{value}' is not a valid port", keys::PG_PORT)))
}

fn check_name(key: &str, value: &str) -> Result<String, ProvisionError> {
    if value.is_empty() {
        return Err(invalid(format!("{key} must not be empty")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(invalid(format!("{key} must not contain whitespace")));
    }
    Ok(value.to_string())
}

fn check_subnet(subnet: Subnet, ip: Ipv4Addr) -> Result<Subnet, ProvisionError> {
    if !subnet.contains(ip) {
        return Err(invalid(format!(
            "{} {ip} is outside {} {subnet}",
            keys::DOCKER_IP,
            keys::SUBNET
        )));
    }
    Ok(subnet)
}

impl EnvironmentProfile {
    /// Build a profile from freshly collected input.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::ProfileInvalid` when any field fails validation.
    pub fn from_fields(
        fields: &ProfileFields,
        package_manager: PackageManager,
        root_dir: &Path,
    ) -> Result<Self, ProvisionError> {
        let docker_ip = parse_ip(&fields.docker_ip)?;
        let subnet = match fields.subnet.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.parse::<Subnet>().map_err(invalid)?,
            _ => Subnet::slash24_of(docker_ip),
        };
        if fields.password.is_empty() {
            return Err(invalid(format!("{} must not be empty", keys::POST_PASSWORD)));
        }
        Ok(Self {
            package_manager: Some(package_manager),
            root_dir: root_dir.to_path_buf(),
            docker_ip,
            user: check_name(keys::POST_USER, fields.user.trim())?,
            password: fields.password.clone(),
            port: parse_port(&fields.port)?,
            db_name: check_name(keys::DBNAME, fields.db_name.trim())?,
            subnet: check_subnet(subnet, docker_ip)?,
            ssl_mode: SslMode::default(),
            ssl_cert: DEFAULT_SSL_CERT.to_string(),
            ssl_key: DEFAULT_SSL_KEY.to_string(),
        })
    }

    /// Build a profile from parsed `KEY=value` entries.
    ///
    /// Unknown keys are ignored so that hand-edited files carrying extra
    /// settings still load. `default_root` is used when `ROOT_DIR` is absent.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::ProfileInvalid` when a required key is
    /// missing or any value fails validation.
    pub fn from_entries<I>(entries: I, default_root: &Path) -> Result<Self, ProvisionError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let map: std::collections::HashMap<String, String> = entries.into_iter().collect();
        let missing: Vec<&str> = REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(invalid(format!("missing key(s): {}", missing.join(", "))));
        }
        let get = |key: &str| map.get(key).map(String::as_str).unwrap_or_default();
        let opt = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let docker_ip = parse_ip(get(keys::DOCKER_IP))?;
        let subnet = match opt(keys::SUBNET) {
            Some(s) => s.parse::<Subnet>().map_err(invalid)?,
            None => Subnet::slash24_of(docker_ip),
        };
        let package_manager = opt(keys::OS)
            .map(|v| v.parse::<PackageManager>().map_err(invalid))
            .transpose()?;
        let ssl_mode = opt(keys::SSL_MODE)
            .map(|v| v.parse::<SslMode>().map_err(invalid))
            .transpose()?
            .unwrap_or_default();
        let password = get(keys::POST_PASSWORD);
        if password.is_empty() {
            return Err(invalid(format!("{} must not be empty", keys::POST_PASSWORD)));
        }

        Ok(Self {
            package_manager,
            root_dir: opt(keys::ROOT_DIR).map_or_else(|| default_root.to_path_buf(), PathBuf::from),
            docker_ip,
            user: check_name(keys::POST_USER, get(keys::POST_USER).trim())?,
            password: password.to_string(),
            port: parse_port(get(keys::PG_PORT))?,
            db_name: check_name(keys::DBNAME, get(keys::DBNAME).trim())?,
            subnet: check_subnet(subnet, docker_ip)?,
            ssl_mode,
            ssl_cert: opt(keys::SSL_CERT).unwrap_or(DEFAULT_SSL_CERT).to_string(),
            ssl_key: opt(keys::SSL_KEY).unwrap_or(DEFAULT_SSL_KEY).to_string(),
        })
    }

    /// Ordered `(key, value)` pairs as written to disk.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(11);
        if let Some(pm) = self.package_manager {
            out.push((keys::OS, pm.id().to_string()));
        }
        out.extend([
            (keys::ROOT_DIR, self.root_dir.display().to_string()),
            (keys::DOCKER_IP, self.docker_ip.to_string()),
            (keys::POST_USER, self.user.clone()),
            (keys::POST_PASSWORD, self.password.clone()),
            (keys::PG_PORT, self.port.to_string()),
            (keys::DBNAME, self.db_name.clone()),
            (keys::SUBNET, self.subnet.to_string()),
            (keys::SSL_MODE, self.ssl_mode.to_string()),
            (keys::SSL_CERT, self.ssl_cert.clone()),
            (keys::SSL_KEY, self.ssl_key.clone()),
        ]);
        out
    }

    /// Serialized environment-file text.
    #[must_use]
    pub fn to_env_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.entries() {
            out.push_str(key);
            out.push('=');
            out.push_str(&quote_env_value(&value));
            out.push('\n');
        }
        out
    }

    /// Absolute path of the server certificate.
    #[must_use]
    pub fn ssl_cert_path(&self) -> PathBuf {
        self.root_dir.join(&self.ssl_cert)
    }

    /// Absolute path of the server private key.
    #[must_use]
    pub fn ssl_key_path(&self) -> PathBuf {
        self.root_dir.join(&self.ssl_key)
    }
}

/// Quote a value so that dotenv parsers read it back verbatim.
///
/// Plain values stay bare. Values with shell-significant characters are
/// single-quoted (literal, no interpolation) unless they contain a single
/// quote, in which case they are double-quoted with `\`, `"` and `$` escaped.
#[must_use]
pub fn quote_env_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-' | '_' | ':' | ',' | '@' | '+'));
    if plain && !value.is_empty() {
        return value.to_string();
    }
    if !value.contains('\'') && !value.contains('\n') {
        return format!("'{value}'");
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
