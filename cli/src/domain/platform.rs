//! Host platform detection and the package-install command table.
//!
//! Pure functions only. The caller supplies the contents of
//! `/etc/os-release`; nothing here touches the filesystem.

use std::fmt;
use std::str::FromStr;

use crate::domain::command::CommandLine;
use crate::domain::error::ProvisionError;

/// Path of the OS identification record.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Package-management family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Debian,
    Rhel,
    Arch,
}

impl PlatformFamily {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Debian => "debian-family",
            Self::Rhel => "rhel-family",
            Self::Arch => "arch-family",
        }
    }

    #[must_use]
    pub fn package_manager(self) -> PackageManager {
        match self {
            Self::Debian => PackageManager::Apt,
            Self::Rhel => PackageManager::Dnf,
            Self::Arch => PackageManager::Pacman,
        }
    }
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Package manager used to install prerequisites. Persisted in the
/// environment file under the `OS` key by its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
}

impl PackageManager {
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
        }
    }

    #[must_use]
    pub fn family(self) -> PlatformFamily {
        match self {
            Self::Apt => PlatformFamily::Debian,
            Self::Dnf => PlatformFamily::Rhel,
            Self::Pacman => PlatformFamily::Arch,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "apt" => Ok(Self::Apt),
            // older profiles written by hand sometimes say yum
            "dnf" | "yum" => Ok(Self::Dnf),
            "pacman" => Ok(Self::Pacman),
            other => Err(format!("unknown package manager '{other}'")),
        }
    }
}

/// Extract the `ID=` value from an os-release record, with quotes stripped.
#[must_use]
pub fn parse_os_release_id(content: &str) -> Option<&str> {
    content
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("ID="))
        .map(|id| id.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|id| !id.is_empty())
}

/// Map a distribution identifier to its package-manager family.
///
/// # Errors
///
/// Returns `ProvisionError::PlatformUnsupported` for any identifier outside
/// the supported set. There is no fallback family.
pub fn family_for_id(id: &str) -> Result<PlatformFamily, ProvisionError> {
    match id {
        "ubuntu" | "debian" => Ok(PlatformFamily::Debian),
        "centos" | "rhel" | "fedora" | "rocky" | "almalinux" => Ok(PlatformFamily::Rhel),
        "arch" => Ok(PlatformFamily::Arch),
        other => Err(ProvisionError::PlatformUnsupported {
            reason: format!("unsupported Linux distribution: {other}"),
        }),
    }
}

/// Detect the platform family from the full os-release text.
///
/// # Errors
///
/// Returns `ProvisionError::PlatformUnsupported` when no `ID=` line exists
/// or the identifier is not supported.
pub fn detect_family(os_release: &str) -> Result<PlatformFamily, ProvisionError> {
    let id = parse_os_release_id(os_release).ok_or_else(|| ProvisionError::PlatformUnsupported {
        reason: "could not determine Linux distribution (no ID= entry)".to_string(),
    })?;
    family_for_id(id)
}

// ── Prerequisite tools ───────────────────────────────────────────────────────

/// Host tools the bootstrapper depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Docker,
    DockerCompose,
    OpenSsl,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Docker, Tool::DockerCompose, Tool::OpenSsl];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::DockerCompose => "docker-compose",
            Self::OpenSsl => "openssl",
        }
    }

    /// The invocation whose exit status tells whether the tool is present.
    #[must_use]
    pub fn version_command(self) -> CommandLine {
        match self {
            Self::Docker => CommandLine::new("docker", ["--version"]),
            Self::DockerCompose => CommandLine::new("docker-compose", ["--version"]),
            Self::OpenSsl => CommandLine::new("openssl", ["version"]),
        }
    }

    /// Distribution package that provides the tool.
    #[must_use]
    pub fn package(self, manager: PackageManager) -> &'static str {
        match (self, manager) {
            (Self::Docker, PackageManager::Apt) => "docker.io",
            (Self::Docker, _) => "docker",
            (Self::DockerCompose, _) => "docker-compose",
            (Self::OpenSsl, _) => "openssl",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commands that install `tool` with `manager`, run in order.
#[must_use]
pub fn install_commands(manager: PackageManager, tool: Tool, sudo: bool) -> Vec<CommandLine> {
    let package = tool.package(manager);
    let commands = match manager {
        PackageManager::Apt => vec![
            CommandLine::new("apt-get", ["update"]),
            CommandLine::new("apt-get", ["install", "-y", package]),
        ],
        PackageManager::Dnf => vec![CommandLine::new("dnf", ["install", "-y", package])],
        PackageManager::Pacman => {
            vec![CommandLine::new("pacman", ["-S", "--noconfirm", package])]
        }
    };
    commands.into_iter().map(|c| c.elevated(sudo)).collect()
}
