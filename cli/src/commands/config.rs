//! `pgstrap config`: show and set settings.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::SettingsStore;
use crate::domain::config::VALID_CONFIG_KEYS;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current settings
    Show,
    /// Set a setting
    Set {
        /// Dotted setting key, e.g. `readiness.max_attempts`
        key: String,
        /// New value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the key or value is invalid or the settings file
/// cannot be written.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<()> {
    let config = app.config_store.load()?;
    let path = app.config_store.path();
    if app.is_json() {
        return json::print(&serde_json::json!({
            "path": path.display().to_string(),
            "settings": config,
        }));
    }
    app.output.header(&format!("Settings ({})", path.display()));
    for key in VALID_CONFIG_KEYS {
        app.output.kv(key, &config.get(key)?);
    }
    Ok(())
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<()> {
    let mut config = app.config_store.load()?;
    config.set(key, value)?;
    app.config_store.save(&config)?;

    if app.is_json() {
        return json::print(&serde_json::json!({ "key": key, "value": config.get(key)? }));
    }
    app.output.success(&format!("Set {key} = {value}"));
    Ok(())
}
