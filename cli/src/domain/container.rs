//! Container state as observed from the container runtime.

use std::fmt;

/// Derived state of the database container. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Absent,
    Starting,
    Running,
    Unreachable,
}

impl ContainerState {
    /// Map a `docker inspect --format {{.State.Status}}` value.
    #[must_use]
    pub fn from_inspect_status(status: &str) -> Self {
        match status.trim() {
            "" => Self::Absent,
            "running" => Self::Running,
            "created" | "restarting" => Self::Starting,
            _ => Self::Unreachable,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Unreachable => "unreachable",
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
