//! Application service: deploy a local project end to end.
//!
//! [`prepare`] validates input, classifies the project, and builds the
//! [`DeployConfig`] without touching the host. [`deploy_site`] runs the
//! pipeline and appends the post-deploy reports.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use siteship_common::{DeployResult, DomainMode, ProjectAnalysis, Strategy};

use crate::application::ports::{
    DirectorySync, ProgressReporter, ProjectInspector, RemoteShell, ToolboxScripts,
};
use crate::application::services::classify::classify;
use crate::application::services::deploy::{self, DeployPorts};
use crate::application::services::server_report;
use crate::domain::deploy::{DEFAULT_CONTAINER_PORT, DEFAULT_NODE_PORT};
use crate::domain::validate::{is_auto_domain, validate_domain};
use crate::domain::{AppName, DeployConfig, DeployError, HostRef, ValidationError};

/// Everything the user asked for. `None` fields fall back to the analysis.
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    pub project_path: PathBuf,
    pub name: Option<String>,
    pub host: String,
    /// `None` means use the analysis recommendation.
    pub strategy: Option<Strategy>,
    pub domain_mode: DomainMode,
    pub domain: Option<String>,
    pub port: Option<u16>,
    pub start_command: Option<String>,
    pub install_command: Option<String>,
    pub env_vars: BTreeMap<String, String>,
}

/// A validated deployment, ready to run or to show for confirmation.
#[derive(Debug, Clone)]
pub struct PreparedDeploy {
    pub analysis: ProjectAnalysis,
    pub config: DeployConfig,
}

/// Port a strategy listens on when neither the user nor the analysis set one.
#[must_use]
pub fn default_port(strategy: Strategy) -> Option<u16> {
    match strategy {
        Strategy::Static => None,
        Strategy::ProcessManaged => Some(DEFAULT_NODE_PORT),
        Strategy::Container => Some(DEFAULT_CONTAINER_PORT),
    }
}

/// Explicit name, else the directory basename, sanitized.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidName`] when nothing usable remains.
pub fn derive_name(explicit: Option<&str>, path: &Path) -> Result<AppName, ValidationError> {
    let raw = match explicit {
        Some(name) => name.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    AppName::sanitize(&raw)
}

/// Validate the request and derive the deploy configuration.
///
/// # Errors
///
/// Returns a [`ValidationError`] for a bad host alias, project path, name or
/// domain. Nothing is sent to the host.
pub fn prepare(inspector: &impl ProjectInspector, request: DeployRequest) -> Result<PreparedDeploy> {
    let host = HostRef::parse(&request.host)?;
    if !inspector.is_dir(&request.project_path) {
        return Err(ValidationError::NotADirectory(request.project_path.display().to_string()).into());
    }
    if let Some(domain) = request.domain.as_deref().filter(|d| !is_auto_domain(Some(*d))) {
        validate_domain(domain)?;
    }
    if request.domain_mode == DomainMode::Proxy && is_auto_domain(request.domain.as_deref()) {
        return Err(ValidationError::MissingDomain.into());
    }

    let analysis = classify(inspector, &request.project_path);

    let name = derive_name(request.name.as_deref(), &request.project_path)?;

    let strategy = request.strategy.unwrap_or(analysis.strategy);
    let port = request
        .port
        .or(analysis.port)
        .or_else(|| default_port(strategy));
    let start_command = request.start_command.or_else(|| analysis.start_command.clone());

    let config = DeployConfig {
        project_path: request.project_path,
        name,
        host,
        strategy,
        domain_mode: request.domain_mode,
        domain: request.domain,
        port,
        start_command,
        install_command: request.install_command,
        env_vars: request.env_vars,
    };
    Ok(PreparedDeploy { analysis, config })
}

/// Run the pipeline and, on success, append the backup and health reports.
///
/// # Errors
///
/// Returns [`DeployError::BuildRequired`] when the project must be built
/// locally first. Remote failures are reported in the returned
/// [`DeployResult`], not as `Err`.
pub async fn deploy_site<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    prepared: &PreparedDeploy,
    reporter: &impl ProgressReporter,
) -> Result<DeployResult>
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    let PreparedDeploy { analysis, config } = prepared;
    if analysis.build_required {
        let hint = analysis
            .build_hint
            .clone()
            .unwrap_or_else(|| "Build the project before deploying.".to_string());
        return Err(DeployError::BuildRequired(hint).into());
    }

    reporter.step(&format!(
        "Deploying '{}' to {} ({})...",
        config.name,
        config.host,
        if deploy::needs_container_synthesis(analysis) {
            Strategy::Container
        } else {
            config.strategy
        }
    ));
    let mut result = deploy::execute(ports, config, analysis).await;
    if !result.ok {
        return Ok(result);
    }

    reporter.step("Checking backups and server resources...");
    let reports = server_report::collect(ports.shell, &config.host, ports.timeouts.probe).await;
    result.lines.extend(reports);
    Ok(result)
}
