//! `TerminalReporter`: the `ProgressReporter` used by commands.
//!
//! On a TTY each `step` drives one spinner that the next `success` or `warn`
//! resolves; elsewhere steps print as `→` lines. A spinner still running when
//! the reporter is dropped belongs to the step that failed and ends with `✗`.

use std::cell::RefCell;

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, Spinner};

pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<Spinner>>,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        let mut active = self.active.borrow_mut();
        if let Some(spinner) = active.as_ref() {
            spinner.set_message(message);
            return;
        }
        if let Some(spinner) = self.ctx.spinner(message) {
            *active = Some(spinner);
        } else if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        match self.active.borrow_mut().take() {
            Some(spinner) => spinner.finish_ok(message),
            None => self.ctx.success(message),
        }
    }

    fn warn(&self, message: &str) {
        let line = format!("  {} {message}", "!".style(self.ctx.styles.warn));
        match self.active.borrow().as_ref() {
            Some(spinner) => spinner.println(&line),
            None if !self.ctx.quiet => println!("{line}"),
            None => {}
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(spinner) = self.active.get_mut().take() {
            spinner.abandon();
        }
    }
}
