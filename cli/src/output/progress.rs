//! Deploy spinner built on indicatif.
//!
//! A deployment is one long indeterminate task, so the only indicator is a
//! spinner whose message tracks the current pipeline step.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];
const RUNNING_TEMPLATE: &str = "  {spinner:.cyan} {msg}";
const DONE_TEMPLATE: &str = "  {prefix} {msg}";
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Style from a constant template, degrading to indicatif's default.
fn style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Start a ticking spinner showing `msg`.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(style(RUNNING_TEMPLATE).tick_strings(TICKS));
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(TICK_INTERVAL);
    pb
}

/// Freeze the spinner as a ✓ or ✗ line.
pub fn finish(pb: &ProgressBar, ok: bool, msg: &str) {
    pb.set_style(style(DONE_TEMPLATE));
    pb.set_prefix(if ok { "✓" } else { "✗" });
    pb.finish_with_message(msg.to_string());
}
