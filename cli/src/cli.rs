//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Bootstrap a local PostgreSQL container in one shot
#[derive(Parser)]
#[command(
    name = "pgstrap",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Increase diagnostic logging on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Never prompt; take every value from flags or the environment
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Working directory holding .env, the compose manifest, and the log
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the database, or verify it when already configured
    Up(commands::up::UpArgs),

    /// Check connectivity to the configured database
    Verify,

    /// Show environment and container status
    Status,

    /// Regenerate the compose manifest from the environment file
    Render,

    /// Generate a self-signed server certificate
    Certs(commands::certs::CertsArgs),

    /// Manage pgstrap settings
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            dir,
            command,
            ..
        } = self;

        if let Command::Version = command {
            return commands::version::run(json);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, dir },
        })?;

        match command {
            Command::Up(args) => commands::up::run(&app, args, &cancel).await,
            Command::Verify => commands::verify::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Render => commands::render::run(&app).await,
            Command::Certs(args) => commands::certs::run(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(json),
        }
    }
}
