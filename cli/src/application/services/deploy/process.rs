//! Process-managed pipeline (PM2).

use std::time::Duration;

use siteship_common::DeployResult;

use super::{
    DeployPorts, StepFailure, StepResult, bind_domain, ensure_owned_dir, finish, probes, push_hints,
    require, sync_project, write_env_file,
};
use crate::application::ports::{DirectorySync, RemoteShell, ToolboxScripts};
use crate::domain::config::missing_script_message;
use crate::domain::deploy::{DEFAULT_INSTALL_COMMAND, DEFAULT_NODE_PORT, DEFAULT_START_COMMAND};
use crate::domain::templates::shell_quote;
use crate::domain::{DeployConfig, DeployLog, ToolboxScript};

/// Deadline for installing Node.js and PM2 on the host.
pub const PROCESS_MANAGER_INSTALL_TIMEOUT: Duration = Duration::from_secs(180);

/// Deadline for `pm2 start`.
pub const START_TIMEOUT: Duration = Duration::from_secs(30);

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
    let port = config.port.unwrap_or(DEFAULT_NODE_PORT);
    let start = config.start_command.as_deref().unwrap_or(DEFAULT_START_COMMAND);
    let install = config.install_command.as_deref().unwrap_or(DEFAULT_INSTALL_COMMAND);
    let dir = config.site_dir();
    let name = config.name.as_str();

    ensure_process_manager(ports, config, log).await?;

    ensure_owned_dir(ports, config, &dir).await?;
    sync_project(ports, config, &dir, log).await?;

    log.push(format!("Running: {install}..."));
    let out = ports
        .shell
        .exec(
            &config.host,
            &format!("cd {} && {install}", shell_quote(&dir)),
            ports.timeouts.install,
        )
        .await;
    require(out, "Install failed")?;
    log.push("Dependencies installed.");

    write_env_file(ports, config, &dir, log).await?;

    // `pm2 delete` exits non-zero when nothing is registered under the name.
    ports
        .shell
        .exec(
            &config.host,
            &format!("pm2 delete {name} 2>/dev/null || true"),
            ports.timeouts.probe,
        )
        .await;
    let out = ports
        .shell
        .exec(
            &config.host,
            &format!(
                "cd {} && PORT={port} pm2 start {} --name {name}",
                shell_quote(&dir),
                shell_quote(start)
            ),
            START_TIMEOUT,
        )
        .await;
    require(out, "PM2 start failed")?;
    let save = ports.shell.exec(&config.host, "pm2 save", ports.timeouts.probe).await;
    if !save.success() {
        log.push(format!(
            "WARNING: pm2 save failed, '{name}' will not restart after a reboot: {}",
            save.diagnostic()
        ));
    }
    log.push(format!("PM2 process '{name}' started on port {port}."));

    let url = bind_domain(ports, config, port, log).await;
    log.blank();
    log.push(format!("Node.js app '{name}' deployed successfully."));
    push_hints(
        log,
        config,
        &[
            format!("pm2 logs {name}"),
            format!("pm2 restart {name}"),
            format!("pm2 stop {name}"),
        ],
    );
    Ok(url)
}

async fn ensure_process_manager<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    log: &mut DeployLog,
) -> StepResult
where
    S: RemoteShell,
    T: ToolboxScripts,
{
    if let Some(version) =
        probes::process_manager_version(ports.shell, &config.host, ports.timeouts.probe).await
    {
        log.push(format!("PM2 found (v{version})."));
        return Ok(());
    }

    log.push("PM2 not found. Installing Node.js + PM2...");
    if !ports.scripts.is_available(ToolboxScript::ProcessManagerSetup) {
        return Err(StepFailure::new(format!(
            "PM2 not installed. {}",
            missing_script_message(ToolboxScript::ProcessManagerSetup)
        )));
    }
    let source = ports
        .scripts
        .read(ToolboxScript::ProcessManagerSetup)
        .map_err(|e| StepFailure::new(format!("PM2 setup failed: {e:#}")))?;
    let out = ports
        .shell
        .exec_with_stdin(&config.host, "bash -s", &source, PROCESS_MANAGER_INSTALL_TIMEOUT)
        .await;
    require(out, "PM2 setup failed")?;
    log.push("Node.js + PM2 installed.");
    Ok(())
}
