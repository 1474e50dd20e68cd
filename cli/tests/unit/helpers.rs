//! Shared test helpers: exit statuses, output constructors, fixtures.

#![allow(dead_code)]

use std::path::Path;
use std::process::{ExitStatus, Output};

use pgstrap_cli::domain::{EnvironmentProfile, PackageManager, ProfileFields};

/// Build an `ExitStatus` from a logical exit code (0 = success).
///
/// The raw wait-status encodes the exit code in bits 8-15.
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

pub fn fields() -> ProfileFields {
    ProfileFields {
        docker_ip: "172.28.0.10".to_string(),
        user: "app".to_string(),
        password: "p@ss'word".to_string(),
        port: "5433".to_string(),
        db_name: "appdb".to_string(),
        subnet: None,
    }
}

#[allow(clippy::expect_used)]
pub fn profile(root: &Path) -> EnvironmentProfile {
    EnvironmentProfile::from_fields(&fields(), PackageManager::Apt, root).expect("valid fields")
}

pub const UBUNTU_OS_RELEASE: &str = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\nID_LIKE=debian\n";
