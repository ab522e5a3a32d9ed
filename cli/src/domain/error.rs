//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Validation errors ─────────────────────────────────────────────────────────

/// Input rejected before any remote call is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid app name '{0}'. Use only lowercase letters, numbers, and dashes.")]
    InvalidName(String),

    #[error("Invalid domain: {0}. Use only letters, numbers, dots, and dashes.")]
    InvalidDomain(String),

    #[error("Invalid host alias '{0}'. Use only letters, numbers, dashes, underscores.")]
    InvalidHost(String),

    #[error("Invalid port {0}. Provide a number between 1 and 65535.")]
    InvalidPort(u32),

    #[error("Invalid environment variable '{0}'. Expected KEY=VALUE with KEY matching [A-Za-z_][A-Za-z0-9_]*.")]
    InvalidEnvVar(String),

    #[error("Domain mode 'proxy' requires a domain (e.g. --domain app.example.com).")]
    MissingDomain,

    #[error("Project path does not exist or is not a directory: {0}")]
    NotADirectory(String),
}

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Preconditions that block a deployment after classification.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Project requires building first. {0}")]
    BuildRequired(String),

    #[error("Deployment not confirmed. Review the analysis, then re-run with --yes.")]
    NotConfirmed,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid default host in config: {0}")]
    InvalidDefaultHost(String),

    #[error("Timeout '{key}' must be greater than zero")]
    ZeroTimeout { key: &'static str },
}
