//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document on
//! stdout: the command's result object, or the error object below.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{ConfigError, DeployError, ValidationError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable result to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{text}");
    Ok(())
}

/// Stable machine-readable code for a command error.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ValidationError>().is_some() {
        "INVALID_INPUT"
    } else if let Some(deploy) = err.downcast_ref::<DeployError>() {
        match deploy {
            DeployError::BuildRequired(_) => "BUILD_REQUIRED",
            DeployError::NotConfirmed => "NOT_CONFIRMED",
        }
    } else if err.chain().any(|c| c.downcast_ref::<ConfigError>().is_some()) {
        "CONFIG_ERROR"
    } else {
        "ERROR"
    }
}
