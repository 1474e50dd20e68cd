//! `pgstrap version`

use anyhow::Result;

/// Print the version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        return crate::output::json::print(&serde_json::json!({ "version": version }));
    }
    println!("pgstrap {version}");
    Ok(())
}
