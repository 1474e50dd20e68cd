//! `pgstrap up`: provision the database, or verify an existing setup.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::ports::{ProfilePrompter, WorkspaceStore as _};
use crate::application::services::provision::{Outcome, ProvisionOptions, provision};
use crate::application::services::reconfigure::RuleChange;
use crate::domain::ProfileFields;
use crate::infra::prompt::{DialoguerPrompter, PresetPrompter, PromptPreset};
use crate::output::{TerminalReporter, json};

/// Arguments for the up command. Unset values are prompted for unless
/// `--yes` is given.
#[derive(Args, Default)]
pub struct UpArgs {
    /// Container IPv4 address on the custom network
    #[arg(long, value_name = "IP")]
    pub docker_ip: Option<String>,

    /// Database superuser name
    #[arg(long)]
    pub user: Option<String>,

    /// Database superuser password
    #[arg(long, env = "PGSTRAP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Host port published to the container's 5432
    #[arg(long)]
    pub port: Option<String>,

    /// Database name
    #[arg(long)]
    pub db_name: Option<String>,

    /// Network subnet in CIDR form (default: the /24 of --docker-ip)
    #[arg(long)]
    pub subnet: Option<String>,
}

impl UpArgs {
    fn preset(self) -> PromptPreset {
        PromptPreset {
            fields: ProfileFields {
                docker_ip: self.docker_ip.unwrap_or_default(),
                user: self.user.unwrap_or_default(),
                password: self.password.unwrap_or_default(),
                port: self.port.unwrap_or_default(),
                db_name: self.db_name.unwrap_or_default(),
                subnet: self.subnet,
            },
            ..PromptPreset::default()
        }
    }
}

#[derive(Serialize)]
struct UpReport {
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<&'static str>,
    installed: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    observations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host_auth_rule: Option<&'static str>,
}

impl From<&Outcome> for UpReport {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::AlreadyConfigured => Self {
                outcome: "already_configured",
                platform: None,
                installed: Vec::new(),
                observations: None,
                host_auth_rule: None,
            },
            Outcome::Provisioned {
                family,
                prerequisites,
                observations,
                rule,
            } => Self {
                outcome: "provisioned",
                platform: Some(family.label()),
                installed: prerequisites.installed.iter().map(|t| t.name()).collect(),
                observations: Some(*observations),
                host_auth_rule: Some(match rule {
                    RuleChange::Appended => "appended",
                    RuleChange::AlreadyPresent => "already_present",
                }),
            },
        }
    }
}

/// Run the up command.
///
/// # Errors
///
/// Returns the first failing stage's error.
pub async fn run(app: &AppContext, args: UpArgs, cancel: &CancellationToken) -> Result<()> {
    let preset = args.preset();
    let outcome = if app.non_interactive {
        run_with(app, &PresetPrompter::new(preset), cancel).await?
    } else {
        run_with(app, &DialoguerPrompter::new(preset), cancel).await?
    };

    if app.is_json() {
        return json::print(&UpReport::from(&outcome));
    }
    match outcome {
        Outcome::AlreadyConfigured => {
            app.output.info("environment file present; provisioning skipped");
        }
        Outcome::Provisioned { .. } => {
            app.output.success("database ready");
            let manifest = app.workspace().manifest_path();
            app.output.kv("manifest", &manifest.display().to_string());
        }
    }
    Ok(())
}

async fn run_with(
    app: &AppContext,
    prompter: &impl ProfilePrompter,
    cancel: &CancellationToken,
) -> Result<Outcome> {
    let reporter = TerminalReporter::new(&app.output);
    provision(
        &app.host(),
        &app.docker(),
        &app.workspace(),
        &app.probe(),
        prompter,
        &app.event_log(),
        ProvisionOptions {
            reporter: &reporter,
            settings: &app.settings,
            cancel,
        },
    )
    .await
}
