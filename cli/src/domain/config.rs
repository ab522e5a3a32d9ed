//! Configuration schema and toolbox layout.
//!
//! Pure functions only. No I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::deploy::{HostRef, Timeouts};
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Host alias used when neither `--host` nor the config file names one.
pub const DEFAULT_HOST: &str = "mikrus";

/// Directory name of the default toolbox checkout under `$HOME`.
pub const DEFAULT_TOOLBOX_DIR: &str = ".mikrus-toolbox";

/// File whose presence marks a directory as a toolbox checkout.
pub const TOOLBOX_MARKER: &str = "local/deploy.sh";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.siteship/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteshipConfig {
    /// SSH alias deployments target by default.
    pub default_host: String,
    /// Explicit location of the toolbox script collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolbox_root: Option<PathBuf>,
    pub timeouts: TimeoutConfig,
}

impl Default for SiteshipConfig {
    fn default() -> Self {
        Self {
            default_host: DEFAULT_HOST.to_string(),
            toolbox_root: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Per-call deadlines in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub probe_secs: u64,
    pub sync_secs: u64,
    pub install_secs: u64,
    pub build_secs: u64,
    pub script_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        let t = Timeouts::default();
        Self {
            probe_secs: t.probe.as_secs(),
            sync_secs: t.sync.as_secs(),
            install_secs: t.install.as_secs(),
            build_secs: t.build.as_secs(),
            script_secs: t.script.as_secs(),
        }
    }
}

impl SiteshipConfig {
    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable default host or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        HostRef::parse(&self.default_host)
            .map_err(|_| ConfigError::InvalidDefaultHost(self.default_host.clone()))?;
        let t = &self.timeouts;
        for (key, value) in [
            ("probe_secs", t.probe_secs),
            ("sync_secs", t.sync_secs),
            ("install_secs", t.install_secs),
            ("build_secs", t.build_secs),
            ("script_secs", t.script_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout { key });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        let t = &self.timeouts;
        Timeouts {
            probe: Duration::from_secs(t.probe_secs),
            sync: Duration::from_secs(t.sync_secs),
            install: Duration::from_secs(t.install_secs),
            build: Duration::from_secs(t.build_secs),
            script: Duration::from_secs(t.script_secs),
        }
    }
}

// ── Toolbox layout ───────────────────────────────────────────────────────────

/// External scripts the pipelines delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolboxScript {
    /// Registers a shared-domain subdomain. Runs locally.
    SubdomainRegistrar,
    /// Creates a DNS record for an owned domain. Runs locally.
    DnsRecord,
    /// Sets up static hosting for a web root. Runs locally.
    StaticHosting,
    /// Installs Node.js and PM2. Piped to the host.
    ProcessManagerSetup,
    /// Installs the reverse proxy. Piped to the host.
    ProxyInstall,
}

impl ToolboxScript {
    /// Path relative to the toolbox root.
    #[must_use]
    pub fn relative_path(self) -> &'static str {
        match self {
            Self::SubdomainRegistrar => "local/cytrus-domain.sh",
            Self::DnsRecord => "local/dns-add.sh",
            Self::StaticHosting => "local/add-static-hosting.sh",
            Self::ProcessManagerSetup => "system/pm2-setup.sh",
            Self::ProxyInstall => "system/caddy-install.sh",
        }
    }
}

/// Resolved toolbox location, passed explicitly to whatever runs scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolboxPaths {
    root: Option<PathBuf>,
}

impl ToolboxPaths {
    #[must_use]
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Absolute script path, or `None` when no toolbox was found.
    #[must_use]
    pub fn script_path(&self, script: ToolboxScript) -> Option<PathBuf> {
        self.root.as_ref().map(|r| r.join(script.relative_path()))
    }
}

/// Pick the toolbox root: env override, then config, then `~/.mikrus-toolbox`.
///
/// A candidate only counts when `is_file(candidate/local/deploy.sh)` holds.
pub fn resolve_toolbox_root(
    env_override: Option<&Path>,
    configured: Option<&Path>,
    home: Option<&Path>,
    is_file: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let default = home.map(|h| h.join(DEFAULT_TOOLBOX_DIR));
    [env_override, configured, default.as_deref()]
        .into_iter()
        .flatten()
        .find(|candidate| is_file(&candidate.join(TOOLBOX_MARKER)))
        .map(Path::to_path_buf)
}

/// Error text for a missing toolbox script.
#[must_use]
pub fn missing_script_message(script: ToolboxScript) -> String {
    format!(
        "Toolbox script not found: {}. Set SITESHIP_TOOLBOX_PATH or toolbox_root to a mikrus-toolbox checkout.",
        script.relative_path()
    )
}

// ── Unit tests ───────────────────────────────────────────────────────────────
