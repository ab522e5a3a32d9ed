//! Static-file pipeline.
//!
//! Redeploying a site that is already served costs one sync: hosting setup
//! only runs when neither a container mount nor the proxy configuration
//! references the web root yet.

use siteship_common::{DeployResult, DomainMode};

use super::{
    DeployPorts, StepFailure, StepResult, ensure_owned_dir, finish, probes, require, sync_project,
};
use crate::application::ports::{DirectorySync, RemoteShell, ToolboxScripts};
use crate::application::services::domain_binding::ensure_proxy_runtime;
use crate::domain::config::missing_script_message;
use crate::domain::deploy::{STATIC_BASE_PORT, SUBDOMAIN_SUFFIX};
use crate::domain::templates::shell_quote;
use crate::domain::validate::{is_auto_domain, validate_domain};
use crate::domain::{DeployConfig, DeployLog, ToolboxScript};

pub async fn deploy<S, Y, T>(ports: &DeployPorts<'_, S, Y, T>, config: &DeployConfig) -> DeployResult
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    let mut log = DeployLog::new();
    let outcome = run(ports, config, &mut log).await;
    finish(log, outcome)
}

async fn run<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    log: &mut DeployLog,
) -> StepResult<Option<String>>
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    let web_root = config.web_root();

    ensure_owned_dir(ports, config, &web_root).await?;
    sync_project(ports, config, &web_root, log).await?;
    let chmod = ports
        .shell
        .exec(
            &config.host,
            &format!("sudo chmod -R o+rX {}", shell_quote(&web_root)),
            ports.timeouts.probe,
        )
        .await;
    require(chmod, "Could not set web root permissions")?;

    let signals = probes::served_signals(ports.shell, &config.host, &web_root, ports.timeouts.probe).await;
    if signals.is_served() {
        tracing::info!(?signals, web_root, "site already served, skipping hosting setup");
        log.blank();
        log.push(format!("Static site '{}' updated (hosting already configured).", config.name));
        log.push(format!("Files: {web_root}"));
        return Ok(None);
    }

    let site_domain = match config.domain_mode {
        DomainMode::LocalOnly => {
            return Err(StepFailure::new(
                "Static sites require a domain (--domain-mode subdomain or proxy). \
                 Use subdomain mode for a free *.byst.re address.",
            ));
        }
        DomainMode::Subdomain => match config.domain.as_deref() {
            Some(d) if !is_auto_domain(Some(d)) => d.to_string(),
            _ => format!("{}.{SUBDOMAIN_SUFFIX}", config.name),
        },
        DomainMode::Proxy => match config.domain.as_deref() {
            Some(d) if !is_auto_domain(Some(d)) => d.to_string(),
            _ => {
                return Err(StepFailure::new(
                    "Proxy mode requires a domain (e.g. --domain static.example.com).",
                ));
            }
        },
    };
    validate_domain(&site_domain).map_err(|e| StepFailure::new(e.to_string()))?;

    if !ports.scripts.is_available(ToolboxScript::StaticHosting) {
        return Err(StepFailure::new(missing_script_message(ToolboxScript::StaticHosting)));
    }
    if config.domain_mode == DomainMode::Proxy {
        ensure_proxy_runtime(ports.shell, ports.scripts, &config.host, ports.timeouts.probe, log).await;
    }

    let port = match config.port {
        Some(port) => port,
        None => probes::free_port(ports.shell, &config.host, STATIC_BASE_PORT, ports.timeouts.probe).await,
    };

    log.push(format!("Setting up static hosting for {site_domain}..."));
    let port_arg = port.to_string();
    let out = ports
        .scripts
        .run(
            ToolboxScript::StaticHosting,
            &[&site_domain, config.host.as_str(), &web_root, &port_arg],
            ports.timeouts.script,
        )
        .await;
    log.push_output(&out.stdout);
    if !out.success() {
        let stderr = out.stderr.trim();
        return Err(StepFailure::new(if stderr.is_empty() {
            "Static hosting setup failed".to_string()
        } else {
            stderr.to_string()
        }));
    }

    let url = format!("https://{site_domain}");
    log.blank();
    log.push(format!("Static site '{}' deployed successfully.", config.name));
    log.push(format!("URL: {url}"));
    log.push(format!("Files: {web_root}"));
    Ok(Some(url))
}
