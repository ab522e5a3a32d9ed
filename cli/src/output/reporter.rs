//! Terminal implementation of the `ProgressReporter` port.

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;
use crate::output::{Mark, OutputContext, progress};

/// Deploy progress on the terminal.
///
/// On a TTY, steps drive a single spinner; otherwise each step is printed as
/// `"  → {message}"`. Everything is suppressed when `ctx.quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    spinner: Option<ProgressBar>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx, spinner: None }
    }

    /// Like [`TerminalReporter::new`], with a spinner when progress is shown.
    #[must_use]
    pub fn with_spinner(ctx: &'a OutputContext, initial: &str) -> Self {
        let spinner = ctx.show_progress().then(|| progress::spinner(initial));
        Self { ctx, spinner }
    }

    /// Stop the spinner, leaving `message` with a ✓ or ✗ prefix.
    pub fn finish(&self, ok: bool, message: &str) {
        if let Some(pb) = &self.spinner {
            progress::finish(pb, ok, message);
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        match &self.spinner {
            Some(pb) => pb.set_message(message.to_string()),
            None => println!("{}", self.ctx.marked(Mark::Step, message)),
        }
    }

    fn success(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = self.ctx.marked(Mark::Success, message);
        match &self.spinner {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }

    fn warn(&self, message: &str) {
        if self.ctx.quiet {
            return;
        }
        let line = self.ctx.marked(Mark::Warning, message);
        match &self.spinner {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        if let Some(pb) = &self.spinner {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
