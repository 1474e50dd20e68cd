//! pgstrap - bootstrap a local PostgreSQL container in one shot

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use pgstrap_cli::cli::Cli;
use pgstrap_cli::domain::ProvisionError;
use pgstrap_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received");
            on_interrupt.cancel();
        }
        // A second interrupt does not wait for the current stage.
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    if let Err(e) = cli.run(cancel).await {
        if json_mode {
            let code = e
                .downcast_ref::<ProvisionError>()
                .map_or("ERROR", ProvisionError::code);
            match json::format_error(&format!("{e:#}"), code) {
                Ok(text) => println!("{text}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
