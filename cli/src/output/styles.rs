//! Terminal palette. Every field is a no-op style until `colorize` runs.

use owo_colors::Style;

use crate::domain::ContainerState;

#[derive(Default, Clone)]
pub struct Styles {
    pub ok: Style,
    pub warn: Style,
    pub fail: Style,
    pub note: Style,
    /// Pipeline step arrows and spinners.
    pub step: Style,
    /// Keys in `key  value` listings.
    pub key: Style,
    pub title: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.ok = Style::new().green();
        self.warn = Style::new().yellow();
        self.fail = Style::new().red();
        self.note = Style::new().blue();
        self.step = Style::new().cyan();
        self.key = Style::new().dimmed();
        self.title = Style::new().bold().cyan();
    }

    /// Colour of a container state in status listings.
    #[must_use]
    pub fn state(&self, state: ContainerState) -> Style {
        match state {
            ContainerState::Running => self.ok,
            ContainerState::Starting => self.warn,
            ContainerState::Unreachable => self.fail,
            ContainerState::Absent => self.key,
        }
    }
}
