//! Application context: unified state passed to every command handler.
//!
//! `AppContext` owns the output context, the working directory, and the
//! loaded settings, and builds the infrastructure adapters commands need.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::SettingsStore;
use crate::domain::PgstrapConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::DockerCli;
use crate::infra::event_log::FileEventLog;
use crate::infra::host::HostSystem;
use crate::infra::openssl::OpensslCli;
use crate::infra::postgres::SqlxProbe;
use crate::infra::workspace::FileWorkspace;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `PGSTRAP_YES` env vars).
    pub yes: bool,
    /// Working directory override.
    pub dir: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Absolute working directory owning `.env`, the manifest, and the log.
    pub root: PathBuf,
    /// Settings file store.
    pub config_store: YamlConfigStore,
    /// Settings loaded at startup.
    pub settings: PgstrapConfig,
    /// When `true`, never prompt.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `PGSTRAP_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or the
    /// settings file exists but cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("PGSTRAP_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let root = resolve_root(flags.behaviour.dir.as_deref())?;
        let config_store = YamlConfigStore::for_root(&root);
        let settings = config_store.load()?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            root,
            config_store,
            settings,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `PGSTRAP_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }

    #[must_use]
    pub fn workspace(&self) -> FileWorkspace {
        FileWorkspace::new(self.root.clone())
    }

    #[must_use]
    pub fn event_log(&self) -> FileEventLog {
        FileEventLog::new(self.root.join(&self.settings.log_file))
    }

    #[must_use]
    pub fn host(&self) -> HostSystem<TokioCommandRunner> {
        HostSystem::new(TokioCommandRunner::default(), self.settings.runtime.use_sudo)
    }

    #[must_use]
    pub fn docker(&self) -> DockerCli<TokioCommandRunner> {
        DockerCli::new(TokioCommandRunner::default(), self.settings.runtime.use_sudo)
    }

    #[must_use]
    pub fn openssl(&self) -> OpensslCli<TokioCommandRunner> {
        OpensslCli::new(TokioCommandRunner::default())
    }

    #[must_use]
    pub fn probe(&self) -> SqlxProbe {
        SqlxProbe::new(self.settings.probe_timeout())
    }
}

fn resolve_root(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().context("cannot determine working directory")?,
    };
    std::path::absolute(&dir).with_context(|| format!("cannot resolve {}", dir.display()))
}
