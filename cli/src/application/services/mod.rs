//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod certificates;
pub mod config_writer;
pub mod connectivity;
pub mod container;
pub mod platform;
pub mod prerequisites;
pub mod provision;
pub mod reconfigure;

use std::process::Output;

use anyhow::Result;

use crate::application::ports::EventLog;

/// Record `result` in the event log when it is an error, then pass it on.
pub(crate) fn logged<T>(log: &impl EventLog, message: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::debug!(error = %e, "{message}");
        log.record(message, Some(e));
    }
    result
}

/// Trimmed stderr, falling back to stdout, of a failed command.
pub(crate) fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim();
    if stdout.is_empty() {
        match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        stdout.to_string()
    }
}
