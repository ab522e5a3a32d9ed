//! Human and JSON presentation.
//!
//! Commands pick a [`Renderer`] from the active mode. Human-mode helpers
//! print through an [`OutputContext`] so `--quiet` and colour rules apply
//! uniformly.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::ffi::OsStr;

use console::Term;
use owo_colors::OwoColorize as _;
pub use human::HumanRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Kind of a status line, which decides its glyph and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Success,
    Warning,
    Error,
    Info,
    /// A pipeline step in progress.
    Step,
}

impl Mark {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Warning => "⚠",
            Self::Error => "✗",
            Self::Info => "ℹ",
            Self::Step => "→",
        }
    }
}

/// `NO_COLOR` convention: any non-empty value disables colour.
#[must_use]
pub fn no_color_requested(value: Option<&OsStr>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Terminal state and palette shared by every human-mode printer.
pub struct OutputContext {
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Suppress everything except errors.
    pub quiet: bool,
}

impl OutputContext {
    /// Detect the TTY on stdout.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        Self::with_tty(no_color, quiet, Term::stdout().is_term())
    }

    #[must_use]
    pub fn with_tty(no_color: bool, quiet: bool, is_tty: bool) -> Self {
        Self {
            styles: Styles::for_terminal(no_color, is_tty),
            is_tty,
            quiet,
        }
    }

    /// Spinners only make sense on an interactive, non-quiet terminal.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// `  <glyph> msg`, with the glyph coloured by `mark`.
    #[must_use]
    pub fn marked(&self, mark: Mark, msg: &str) -> String {
        let style = match mark {
            Mark::Success => self.styles.success,
            Mark::Warning => self.styles.warning,
            Mark::Error => self.styles.error,
            Mark::Info | Mark::Step => self.styles.info,
        };
        format!("  {} {msg}", mark.glyph().style(style))
    }

    fn emit(&self, mark: Mark, msg: &str) {
        if !self.quiet {
            println!("{}", self.marked(mark, msg));
        }
    }

    pub fn success(&self, msg: &str) {
        self.emit(Mark::Success, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Mark::Warning, msg);
    }

    /// Goes to stderr and ignores `quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.marked(Mark::Error, msg));
    }

    pub fn info(&self, msg: &str) {
        self.emit(Mark::Info, msg);
    }

    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Aligned `key  value` row with the key dimmed.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Renderer for the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json,
}
