//! Terminal output for the `sw` commands.
//!
//! Status lines go to stderr so that `sw render` can pipe HTML on stdout.

use std::fmt::Display;

use console::{Style, Term};

/// How a status line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
    Heading,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Good => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Bad => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
        }
    }
}

pub(crate) struct Output {
    status: Term,
    label: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            label: Style::new().dim(),
        }
    }

    /// Write one status line in the given tone.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let _ = self
            .status
            .write_line(&tone.style().apply_to(msg).to_string());
    }

    /// Write an indented `label: value` status line.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let _ = self
            .status
            .write_line(&format!("  {} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// Write a command result to stdout.
    pub(crate) fn result(&self, text: &str) -> std::io::Result<()> {
        Term::stdout().write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tone_leaves_text_unstyled() {
        console::set_colors_enabled(false);

        assert_eq!(Tone::Plain.style().apply_to("ok").to_string(), "ok");
        assert_eq!(Tone::Bad.style().apply_to("failed").to_string(), "failed");
    }
}
