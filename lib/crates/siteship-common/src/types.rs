use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project kind detected from the marker files in a local directory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectType {
    #[serde(rename = "compose-defined")]
    ComposeDefined,
    #[serde(rename = "dockerfile-only")]
    DockerfileOnly,
    #[serde(rename = "next.js")]
    NextJs,
    #[serde(rename = "generic-node")]
    GenericNode,
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "static-html")]
    StaticHtml,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ProjectType {
    /// Wire name, identical to the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ComposeDefined => "compose-defined",
            Self::DockerfileOnly => "dockerfile-only",
            Self::NextJs => "next.js",
            Self::GenericNode => "generic-node",
            Self::Python => "python",
            Self::StaticHtml => "static-html",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provisioning pipeline used on the remote host.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Files served by a web server from a web root.
    Static,
    /// Long-running process supervised by a process manager.
    #[cfg_attr(feature = "clap", value(alias = "node"))]
    ProcessManaged,
    /// Container stack built and started on the host.
    #[cfg_attr(feature = "clap", value(alias = "docker"))]
    Container,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::ProcessManaged => "process-managed",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a deployed service is exposed publicly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DomainMode {
    /// Free subdomain on a shared domain, registered through the host provider.
    #[cfg_attr(feature = "clap", value(alias = "cytrus"))]
    Subdomain,
    /// Owned domain behind a reverse proxy running on the host.
    #[cfg_attr(feature = "clap", value(alias = "cloudflare"))]
    Proxy,
    /// No public exposure.
    #[default]
    #[cfg_attr(feature = "clap", value(alias = "local"))]
    LocalOnly,
}

impl DomainMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subdomain => "subdomain",
            Self::Proxy => "proxy",
            Self::LocalOnly => "local-only",
        }
    }
}

impl fmt::Display for DomainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum from its wire name fails.
#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Strategy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "process-managed" | "node" => Ok(Self::ProcessManaged),
            "container" | "docker" => Ok(Self::Container),
            other => Err(ParseEnumError {
                kind: "strategy",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for DomainMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subdomain" | "cytrus" => Ok(Self::Subdomain),
            "proxy" | "cloudflare" => Ok(Self::Proxy),
            "local-only" | "local" => Ok(Self::LocalOnly),
            other => Err(ParseEnumError {
                kind: "domain mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Result of classifying a local project directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub strategy: Strategy,
    /// Marker files found, in detection order.
    pub files: Vec<String>,
    pub total_files: u64,
    #[serde(rename = "totalSizeKB")]
    pub total_size_kb: u64,
    pub port: Option<u16>,
    pub start_command: Option<String>,
    pub build_required: bool,
    pub build_hint: Option<String>,
    pub warnings: Vec<String>,
    pub summary: String,
}

/// Outcome of a domain binding attempt.
///
/// Only constructible through the associated functions, which keep
/// `ok == false` paired with an error and a bound `ok == true` paired with a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainResult {
    ok: bool,
    url: Option<String>,
    domain: Option<String>,
    error: Option<String>,
}

impl DomainResult {
    /// A public binding that succeeded.
    #[must_use]
    pub fn bound(url: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            ok: true,
            url: Some(url.into()),
            domain,
            error: None,
        }
    }

    /// A binding attempt that failed.
    #[must_use]
    pub fn failed(error: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            ok: false,
            url: None,
            domain,
            error: Some(error.into()),
        }
    }

    /// No public exposure requested: loopback URL when a port is known.
    #[must_use]
    pub fn local_only(port: Option<u16>) -> Self {
        Self {
            ok: true,
            url: port.map(|p| format!("http://localhost:{p}")),
            domain: None,
            error: None,
        }
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        self.ok
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome of a deployment pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployResult {
    pub ok: bool,
    /// Progress messages in the order they were produced.
    pub lines: Vec<String>,
    pub url: Option<String>,
    pub error: Option<String>,
}
