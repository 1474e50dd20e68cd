//! Compose manifest rendering.
//!
//! `render_manifest` is a pure function of the profile and the service
//! options: the same inputs always yield byte-identical text.

use std::path::PathBuf;

use crate::domain::hba::{CUSTOM_MOUNT, HBA_FILE};
use crate::domain::profile::EnvironmentProfile;

/// Manifest location, relative to the working directory.
pub const MANIFEST_FILE: &str = ".docker/compose/docker-compose.yml";

/// Host directory bind-mounted into the container, relative to the working directory.
pub const MOUNTS_DIR: &str = ".docker/compose/mounts";

/// Marker line present at the top of every generated manifest.
pub const GENERATED_MARKER: &str = "# THIS FILE IS AUTO-GENERATED BY pgstrap";

/// Port PostgreSQL listens on inside the container.
pub const CONTAINER_PORT: u16 = 5432;

/// Service-level options that do not live in the environment profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestOptions {
    pub image: String,
    pub container_name: String,
}

/// Escape a value for a double-quoted YAML scalar that compose will also
/// interpolate (`$` must be doubled).
fn yaml_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("$$"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Absolute host path of the bind-mounted configuration directory.
#[must_use]
pub fn mounts_dir(profile: &EnvironmentProfile) -> PathBuf {
    profile.root_dir.join(MOUNTS_DIR)
}

/// Render the compose manifest for `profile`.
#[must_use]
pub fn render_manifest(profile: &EnvironmentProfile, opts: &ManifestOptions) -> String {
    let mounts = mounts_dir(profile);
    let mount_spec = format!("{}:{CUSTOM_MOUNT}", mounts.display());
    let port_spec = format!("{}:{CONTAINER_PORT}", profile.port);

    format!(
        "{GENERATED_MARKER}
# DO NOT EDIT THIS FILE
# TO MAKE CHANGES, EDIT THE .env FILE AND RUN `pgstrap render`
services:
  postgres:
    image: {image}
    container_name: {container}
    environment:
      POSTGRES_USER: {user}
      POSTGRES_PASSWORD: {password}
      POSTGRES_DB: {db}
    ports:
      - {ports}
    networks:
      pgstrap_network:
        ipv4_address: {ip}
    volumes:
      - postgres_data:/var/lib/postgresql/data
      - {mount}
    command:
      - \"postgres\"
      - \"-c\"
      - \"config_file=/var/lib/postgresql/data/postgresql.conf\"
      - \"-c\"
      - \"hba_file={hba}\"

networks:
  pgstrap_network:
    driver: bridge
    ipam:
      config:
        - subnet: {subnet}

volumes:
  postgres_data:
",
        image = yaml_quoted(&opts.image),
        container = yaml_quoted(&opts.container_name),
        user = yaml_quoted(&profile.user),
        password = yaml_quoted(&profile.password),
        db = yaml_quoted(&profile.db_name),
        ports = yaml_quoted(&port_spec),
        ip = yaml_quoted(&profile.docker_ip.to_string()),
        mount = yaml_quoted(&mount_spec),
        hba = HBA_FILE,
        subnet = yaml_quoted(&profile.subnet.to_string()),
    )
}
