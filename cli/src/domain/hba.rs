//! Host-based authentication file content and rule matching.

/// Directory inside the container where the custom config mount lands.
pub const CUSTOM_MOUNT: &str = "/var/lib/postgresql/custom";

/// Host-based authentication file the server is started with.
pub const HBA_FILE: &str = "/var/lib/postgresql/custom/pg_hba.conf";

/// Data directory inside the container.
pub const DATA_DIR: &str = "/var/lib/postgresql/data";

/// Rule appended after start: any database, any user, any address,
/// password authenticated.
pub const REMOTE_PASSWORD_RULE: &str = "host    all    all    0.0.0.0/0    scram-sha-256";

/// Seed content written before the first start so the server can boot.
pub const SEED_HBA: &str = "\
# Generated by pgstrap. Rules appended at runtime follow the seed block.
# TYPE  DATABASE        USER            ADDRESS                 METHOD
local   all             all                                     trust
host    all             all             127.0.0.1/32            trust
host    all             all             ::1/128                 trust
";

fn fields(line: &str) -> Option<Vec<&str>> {
    let line = line.split('#').next().unwrap_or_default();
    let parts: Vec<&str> = line.split_whitespace().collect();
    (!parts.is_empty()).then_some(parts)
}

/// Whether `content` already holds a rule equivalent to `rule`.
///
/// Comparison is per whitespace-separated field, so column alignment and
/// trailing comments do not matter.
#[must_use]
pub fn contains_rule(content: &str, rule: &str) -> bool {
    let Some(wanted) = fields(rule) else {
        return false;
    };
    content
        .lines()
        .filter_map(fields)
        .any(|have| have == wanted)
}
