//! Command implementations

pub mod analyze;
pub mod deploy;
pub mod domain;
pub mod version;

use crate::domain::validate::validate_port;

/// clap value parser for `--port`: an integer in 1..=65535.
///
/// # Errors
///
/// Returns a message when the value is not a number or out of range.
pub fn parse_port(raw: &str) -> Result<u16, String> {
    let n: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a port number"))?;
    validate_port(n).map_err(|e| e.to_string())
}
