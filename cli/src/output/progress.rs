//! Spinner shown while a pipeline step or probe is in flight.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

fn done_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {prefix} {msg}")
        .expect("valid template")
}

/// An indeterminate spinner that ends with a `✓` or `✗` line.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    #[must_use]
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(TICKS)
                .template("  {spinner:.cyan} {msg}")
                .expect("valid template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Print `line` above the spinner without corrupting it.
    pub fn println(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }

    pub fn finish_ok(&self, message: &str) {
        self.finish("✓", message);
    }

    pub fn finish_error(&self, message: &str) {
        self.finish("✗", message);
    }

    /// End with `✗` and the step that was running.
    pub fn abandon(&self) {
        let message = self.bar.message();
        self.finish("✗", &message);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    fn finish(&self, mark: &'static str, message: &str) {
        self.bar.set_style(done_style());
        self.bar.set_prefix(mark);
        self.bar.finish_with_message(message.to_string());
    }
}
