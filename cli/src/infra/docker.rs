//! Infrastructure implementation of the `ContainerEngine` port.
//!
//! `DockerCli<R>` routes every docker, docker-compose, and systemctl call
//! through a `CommandRunner`, prefixing `sudo` when configured.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ContainerEngine};
use crate::domain::CommandLine;
use crate::infra::command_runner::COMPOSE_TIMEOUT;

pub struct DockerCli<R: CommandRunner> {
    runner: R,
    sudo: bool,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R, sudo: bool) -> Self {
        Self { runner, sudo }
    }

    fn command<const N: usize>(&self, program: &str, args: [&str; N]) -> CommandLine {
        CommandLine::new(program, args).elevated(self.sudo)
    }

    async fn run(&self, cmd: CommandLine) -> Result<Output> {
        self.runner
            .run(&cmd.program, &cmd.arg_refs())
            .await
            .with_context(|| format!("running {cmd}"))
    }
}

impl<R: CommandRunner> ContainerEngine for DockerCli<R> {
    async fn enable_service(&self) -> Result<Output> {
        self.run(self.command("systemctl", ["enable", "docker"])).await
    }

    async fn start_service(&self) -> Result<Output> {
        self.run(self.command("systemctl", ["start", "docker"])).await
    }

    async fn compose_up(&self, manifest: &Path) -> Result<Output> {
        let manifest = manifest.to_string_lossy();
        let cmd = self.command("docker-compose", ["-f", &*manifest, "up", "-d"]);
        self.runner
            .run_with_timeout(&cmd.program, &cmd.arg_refs(), COMPOSE_TIMEOUT)
            .await
            .with_context(|| format!("running {cmd}"))
    }

    async fn list_running(&self, name: &str) -> Result<Output> {
        // Docker matches name filters as unanchored patterns.
        let filter = format!("name=^{name}$");
        self.run(self.command("docker", ["ps", "--filter", filter.as_str(), "--quiet"]))
            .await
    }

    async fn inspect_status(&self, name: &str) -> Result<Output> {
        self.run(self.command(
            "docker",
            ["inspect", "--format", "{{.State.Status}}", name],
        ))
        .await
    }

    async fn exec(&self, container: &str, user: Option<&str>, args: &[&str]) -> Result<Output> {
        let mut full = vec!["exec".to_string()];
        if let Some(user) = user {
            full.push("-u".to_string());
            full.push(user.to_string());
        }
        full.push(container.to_string());
        full.extend(args.iter().map(|a| (*a).to_string()));
        self.run(CommandLine::new("docker", full).elevated(self.sudo))
            .await
    }
}
