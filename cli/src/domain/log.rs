//! Log artifact line format.

use chrono::{DateTime, SecondsFormat, Utc};

/// One log line: `<timestamp> <message>: <error-or-empty>`.
#[must_use]
pub fn format_log_line(at: DateTime<Utc>, message: &str, error: Option<&str>) -> String {
    // Multi-line causes are flattened so that one record stays one line.
    let error = error.unwrap_or_default().replace('\n', " | ");
    format!(
        "{} {message}: {error}",
        at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
