//! Deployment domain types: validated identifiers, the deploy configuration,
//! the append-only deploy log, and host layout constants.
//!
//! Pure data and functions only. No I/O, no async.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use siteship_common::{DeployResult, DomainMode, DomainResult, Strategy};

use crate::domain::error::ValidationError;
use crate::domain::validate::{APP_NAME_RE, HOST_ALIAS_RE};

// ── Host layout ───────────────────────────────────────────────────────────────

/// Parent of every static web root on the host.
pub const WEB_ROOT_BASE: &str = "/var/www/public";

/// Parent of process-managed app directories.
pub const SITES_BASE: &str = "/opt/sites";

/// Parent of container stack directories.
pub const STACKS_BASE: &str = "/opt/stacks";

/// Reverse-proxy configuration consulted by the "already served" probe.
pub const PROXY_CONFIG_PATH: &str = "/etc/caddy/Caddyfile";

/// First port tried when allocating a port for new static hosting.
pub const STATIC_BASE_PORT: u16 = 8096;

/// Suffix used for automatically named static subdomains.
pub const SUBDOMAIN_SUFFIX: &str = "byst.re";

pub const DEFAULT_NODE_PORT: u16 = 3000;
pub const DEFAULT_CONTAINER_PORT: u16 = 3000;
pub const DEFAULT_PYTHON_PORT: u16 = 8000;
pub const DEFAULT_START_COMMAND: &str = "npm start";
pub const DEFAULT_INSTALL_COMMAND: &str = "npm install --production";

/// Patterns never uploaded by the mirror-sync.
pub const SYNC_EXCLUDES: &[&str] = &[
    ".git",
    "node_modules",
    ".env",
    ".env.*",
    "__pycache__",
    ".next",
    ".DS_Store",
    "*.pyc",
    ".venv",
    "venv",
];

// ── Identifiers ───────────────────────────────────────────────────────────────

/// Normalized app name: lowercase alphanumeric and dashes, alphanumeric first.
///
/// Used verbatim in remote paths and process names, so it can only be built
/// through [`AppName::sanitize`] or [`AppName::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    /// Normalize a raw user-supplied name.
    ///
    /// Lowercases, replaces every character outside `[a-z0-9-]` with `-`, and
    /// trims leading/trailing dashes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidName`] when nothing usable remains.
    pub fn sanitize(raw: &str) -> Result<Self, ValidationError> {
        let replaced: String = raw
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        Self::parse(replaced.trim_matches('-'))
            .map_err(|_| ValidationError::InvalidName(raw.to_string()))
    }

    /// Accept an already-normalized name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidName`] if `name` is not normalized.
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        if APP_NAME_RE.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(ValidationError::InvalidName(name.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to the remote machine (an ssh config alias).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostRef(String);

impl HostRef {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidHost`] for anything that could be
    /// mistaken for an ssh option or contains shell metacharacters.
    pub fn parse(alias: &str) -> Result<Self, ValidationError> {
        if HOST_ALIAS_RE.is_match(alias) {
            Ok(Self(alias.to_string()))
        } else {
            Err(ValidationError::InvalidHost(alias.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Deploy configuration ──────────────────────────────────────────────────────

/// Everything a pipeline needs, built once from the analysis plus overrides.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub project_path: PathBuf,
    pub name: AppName,
    pub host: HostRef,
    pub strategy: Strategy,
    pub domain_mode: DomainMode,
    pub domain: Option<String>,
    pub port: Option<u16>,
    pub start_command: Option<String>,
    pub install_command: Option<String>,
    pub env_vars: BTreeMap<String, String>,
}

impl DeployConfig {
    #[must_use]
    pub fn web_root(&self) -> String {
        format!("{WEB_ROOT_BASE}/{}", self.name)
    }

    #[must_use]
    pub fn site_dir(&self) -> String {
        format!("{SITES_BASE}/{}", self.name)
    }

    #[must_use]
    pub fn stack_dir(&self) -> String {
        format!("{STACKS_BASE}/{}", self.name)
    }
}

// ── Timeouts ──────────────────────────────────────────────────────────────────

/// Per-call deadlines. Exceeding one fails the step like a non-zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Short host-state probes and small file writes.
    pub probe: Duration,
    /// Mirror-sync of the project tree.
    pub sync: Duration,
    /// Remote dependency installation.
    pub install: Duration,
    /// Container image builds.
    pub build: Duration,
    /// External toolbox scripts.
    pub script: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            probe: Duration::from_secs(10),
            sync: Duration::from_secs(300),
            install: Duration::from_secs(300),
            build: Duration::from_secs(600),
            script: Duration::from_secs(120),
        }
    }
}

// ── Deploy log ────────────────────────────────────────────────────────────────

/// Append-only progress log that finishes into a [`DeployResult`].
///
/// `fail` and `succeed` consume the log, so nothing can be appended after the
/// pipeline has stopped.
#[derive(Debug, Default)]
pub struct DeployLog {
    lines: Vec<String>,
}

impl DeployLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append captured command output, skipping it when blank.
    pub fn push_output(&mut self, output: &str) {
        let trimmed = output.trim();
        if !trimmed.is_empty() {
            self.lines.push(trimmed.to_string());
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Record the outcome of a domain binding without failing the pipeline.
    pub fn push_domain_result(&mut self, result: &DomainResult) {
        if let (true, Some(url)) = (result.ok(), result.url()) {
            self.push(format!("Domain configured: {url}"));
        } else if let Some(error) = result.error() {
            self.push(format!("Domain warning: {error}"));
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn fail(self, error: impl Into<String>) -> DeployResult {
        DeployResult {
            ok: false,
            lines: self.lines,
            url: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn succeed(self, url: Option<String>) -> DeployResult {
        DeployResult {
            ok: true,
            lines: self.lines,
            url,
            error: None,
        }
    }
}

// ── Port allocation ───────────────────────────────────────────────────────────

/// First port at or above `base` that is not in `used`.
#[must_use]
pub fn first_free_port(base: u16, used: &BTreeSet<u16>) -> u16 {
    let mut port = base;
    while used.contains(&port) && port < u16::MAX {
        port += 1;
    }
    port
}
