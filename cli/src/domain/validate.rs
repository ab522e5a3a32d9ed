//! Pure input validation. No I/O, no async.
//!
//! Every user-supplied value that ends up inside a remote shell command or a
//! remote path is checked here first.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ValidationError;

/// Normalized app names, used as remote directory and process names.
pub static APP_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Compile-time constant pattern; cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid regex")
});

/// SSH host aliases; a leading dash would be read as an ssh option.
pub static HOST_ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]*$").expect("valid regex")
});

/// Domain names: letters, digits, dots and dashes, alphanumeric at both ends.
pub static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9.-]*[a-z0-9])?$").expect("valid regex")
});

/// Environment variable keys.
pub static ENV_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex")
});

/// Sentinel passed to the subdomain registrar to request automatic assignment.
pub const AUTO_DOMAIN_SENTINEL: &str = "-";

/// Value accepted from users in place of the sentinel.
pub const AUTO_DOMAIN: &str = "auto";

/// Validate a domain name, accepting the auto-assignment sentinel unconditionally.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDomain`] when the name has characters
/// outside `[a-z0-9.-]`, an empty label, or a dash/dot at either end.
pub fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if domain == AUTO_DOMAIN_SENTINEL {
        return Ok(());
    }
    if !DOMAIN_RE.is_match(domain) || domain.contains("..") {
        return Err(ValidationError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}

/// Returns `true` when the user asked for an automatically assigned domain.
#[must_use]
pub fn is_auto_domain(domain: Option<&str>) -> bool {
    matches!(domain, None | Some(AUTO_DOMAIN | AUTO_DOMAIN_SENTINEL))
}

/// Validate a TCP port number coming from user input.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPort`] outside `1..=65535`.
pub fn validate_port(port: u32) -> Result<u16, ValidationError> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ValidationError::InvalidPort(port))
}

/// Split a `KEY=VALUE` pair, validating the key.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEnvVar`] when there is no `=` or the key
/// is not a valid identifier.
pub fn parse_env_pair(pair: &str) -> Result<(String, String), ValidationError> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidEnvVar(pair.to_string()))?;
    if !ENV_KEY_RE.is_match(key) || value.contains('\n') {
        return Err(ValidationError::InvalidEnvVar(pair.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}
