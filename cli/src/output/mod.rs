//! Terminal and JSON presentation.
//!
//! Human output goes to stdout as `  <mark> <message>` lines. In `--json`
//! mode the context is quiet and each command prints one object instead.

pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use progress::Spinner;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::domain::ContainerState;

pub struct OutputContext {
    pub styles: Styles,
    pub is_tty: bool,
    /// Suppresses everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Colours are used only on a TTY, and never when `no_color` or the
    /// `NO_COLOR` variable is set.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let mut styles = Styles::default();
        if !no_color && is_tty && std::env::var_os("NO_COLOR").is_none() {
            styles.colorize();
        }
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// A running spinner, or `None` when progress is not shown.
    #[must_use]
    pub fn spinner(&self, message: &str) -> Option<Spinner> {
        self.show_progress().then(|| Spinner::start(message))
    }

    fn line(&self, mark: &str, style: owo_colors::Style, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", mark.style(style));
        }
    }

    pub fn success(&self, msg: &str) {
        self.line("✓", self.styles.ok, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line("⚠", self.styles.warn, msg);
    }

    /// Always printed, on stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.fail));
    }

    pub fn info(&self, msg: &str) {
        self.line("ℹ", self.styles.note, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.title));
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            let key = format!("{key:<12}");
            println!("  {} {value}", key.style(self.styles.key));
        }
    }

    /// `key  <state>` with the state coloured by health.
    pub fn state(&self, key: &str, name: &str, state: ContainerState) {
        let painted = state.as_str().style(self.styles.state(state)).to_string();
        self.kv(key, &format!("{name} ({painted})"));
    }
}
