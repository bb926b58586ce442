//! Terminal output.
//!
//! Two kinds of output go to stdout:
//!
//! - *status* lines (headers, `✓`/`⚠`/`ℹ` marks, free text), dropped with
//!   `--quiet` or `--output-format json`;
//! - *results* ([`OutputManager::data`] and [`OutputManager::json`]), always
//!   written so scripts can consume them.
//!
//! Logs and errors go to stderr and are not handled here.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::{OwoColorize, Style};
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Status mark placed in front of a message.
#[derive(Debug, Clone, Copy)]
enum Mark {
    Success,
    Warning,
    Info,
}

impl Mark {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Info => Style::new().blue(),
        }
    }
}

/// Writes command output to stdout according to the global flags.
pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    colored: bool,
    term: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = match args.output_format {
            OutputFormat::Auto if io::stdout().is_terminal() => OutputFormat::Human,
            OutputFormat::Auto => OutputFormat::Plain,
            explicit => explicit,
        };
        let colored = format == OutputFormat::Human && !args.no_color && !config.output.no_color;

        Self {
            format,
            quiet: args.quiet,
            colored,
            term: Term::stdout(),
        }
    }

    // ── status ────────────────────────────────────────────────────────────

    pub fn print(&self, msg: &str) -> io::Result<()> {
        self.status(msg.to_owned())
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Success, msg)
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Warning, msg)
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        self.marked(Mark::Info, msg)
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        let line = if self.colored {
            text.style(Style::new().cyan().bold()).to_string()
        } else {
            text.to_owned()
        };
        self.status(line)
    }

    // ── results ───────────────────────────────────────────────────────────

    /// Command result, written even in quiet mode.
    pub fn data(&self, msg: &str) -> io::Result<()> {
        self.term.write_line(msg)
    }

    /// Pretty-printed JSON result, written even in quiet mode.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value)?;
        self.term.write_line(&text)
    }

    pub fn supports_color(&self) -> bool {
        self.colored
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn marked(&self, mark: Mark, msg: &str) -> io::Result<()> {
        let line = if self.colored {
            let style = mark.style();
            format!("{} {}", mark.symbol().style(style.bold()), msg.style(style))
        } else {
            format!("{} {msg}", mark.symbol())
        };
        self.status(line)
    }

    fn status(&self, line: String) -> io::Result<()> {
        if self.suppressed() {
            return Ok(());
        }
        self.term.write_line(&line)
    }

    fn suppressed(&self) -> bool {
        self.quiet || self.is_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(quiet: bool, no_color: bool, output_format: OutputFormat) -> GlobalArgs {
        GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format,
        }
    }

    fn manager(quiet: bool, no_color: bool, output_format: OutputFormat) -> OutputManager {
        OutputManager::new(&args(quiet, no_color, output_format), &AppConfig::default())
    }

    #[test]
    fn quiet_drops_status_lines() {
        let out = manager(true, true, OutputFormat::Plain);
        assert!(out.suppressed());
        assert!(out.print("hello").is_ok());
        assert!(out.success("done").is_ok());
    }

    #[test]
    fn json_drops_status_lines() {
        let out = manager(false, false, OutputFormat::Json);
        assert!(out.is_json());
        assert!(out.suppressed());
        assert!(!manager(false, false, OutputFormat::Human).is_json());
    }

    #[test]
    fn color_only_for_human_format() {
        assert!(manager(false, false, OutputFormat::Human).supports_color());
        assert!(!manager(false, true, OutputFormat::Human).supports_color());
        assert!(!manager(false, false, OutputFormat::Plain).supports_color());
        assert!(!manager(false, false, OutputFormat::Json).supports_color());
    }

    #[test]
    fn config_can_disable_color() {
        let mut config = AppConfig::default();
        config.output.no_color = true;
        let out = OutputManager::new(&args(false, false, OutputFormat::Human), &config);
        assert!(!out.supports_color());
    }
}
