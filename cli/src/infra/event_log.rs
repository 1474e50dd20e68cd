//! Append-only log artifact.

use std::io::Write as _;
use std::path::PathBuf;

use chrono::Utc;

use crate::application::ports::EventLog;
use crate::domain::log::format_log_line;

/// `EventLog` that appends one line per record to a file.
///
/// Each record opens the file in append mode, so concurrent writers never
/// truncate each other and nothing is held open between records.
pub struct FileEventLog {
    path: PathBuf,
}

impl FileEventLog {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EventLog for FileEventLog {
    fn record(&self, message: &str, error: Option<&anyhow::Error>) {
        let error = error.map(|e| format!("{e:#}"));
        let line = format_log_line(Utc::now(), message, error.as_deref());
        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{line}"));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "cannot write log");
        }
    }
}
