//! Container pipeline, and the synthesis variant for Python projects that
//! ship without a build file.

use siteship_common::DeployResult;

use super::{
    DeployPorts, StepFailure, StepResult, bind_domain, ensure_owned_dir, finish, probes, push_hints,
    sync_project, write_env_file, write_remote_file,
};
use crate::application::ports::{DirectorySync, RemoteShell, ToolboxScripts};
use crate::domain::deploy::{DEFAULT_CONTAINER_PORT, DEFAULT_PYTHON_PORT};
use crate::domain::templates::{compose_manifest, python_dockerfile, shell_quote};
use crate::domain::{DeployConfig, DeployLog};

/// Deploy a project that has its own build file or compose manifest.
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

/// Generate a build file and compose manifest, then deploy as a container.
pub async fn deploy_synthesized<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
) -> DeployResult
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    let mut log = DeployLog::new();
    let outcome = run_synthesized(ports, config, &mut log).await;
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
    let port = config.port.unwrap_or(DEFAULT_CONTAINER_PORT);
    let dir = config.stack_dir();

    ensure_owned_dir(ports, config, &dir).await?;
    sync_project(ports, config, &dir, log).await?;

    if !probes::compose_present(ports.shell, &config.host, &dir, ports.timeouts.probe).await {
        log.push("No compose manifest found. Generating docker-compose.yaml...");
        write_remote_file(
            ports,
            config,
            &format!("{dir}/docker-compose.yaml"),
            &compose_manifest(&config.name, port),
        )
        .await?;
    }

    launch(ports, config, &dir, port, "Container app", log).await
}

async fn run_synthesized<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    log: &mut DeployLog,
) -> StepResult<Option<String>>
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    let port = config.port.unwrap_or(DEFAULT_PYTHON_PORT);
    let dir = config.stack_dir();

    ensure_owned_dir(ports, config, &dir).await?;
    sync_project(ports, config, &dir, log).await?;

    write_remote_file(ports, config, &format!("{dir}/Dockerfile"), &python_dockerfile(port)).await?;
    log.push("Generated Dockerfile for Python project.");
    write_remote_file(
        ports,
        config,
        &format!("{dir}/docker-compose.yaml"),
        &compose_manifest(&config.name, port),
    )
    .await?;
    log.push("Generated docker-compose.yaml.");

    launch(ports, config, &dir, port, "Python app", log).await
}

/// Shared tail: env file, build and start, reachability, domain, hints.
async fn launch<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    dir: &str,
    port: u16,
    label: &str,
    log: &mut DeployLog,
) -> StepResult<Option<String>>
where
    S: RemoteShell,
    T: ToolboxScripts,
{
    write_env_file(ports, config, dir, log).await?;

    log.push("Building and starting containers...");
    let quoted_dir = shell_quote(dir);
    let up = ports
        .shell
        .exec(
            &config.host,
            &format!("cd {quoted_dir} && sudo docker compose up -d --build 2>&1"),
            ports.timeouts.build,
        )
        .await;
    if !up.success() {
        log.push_output(&up.stdout);
        let detail = if up.stderr.trim().is_empty() {
            format!("exit code {}", up.exit_code)
        } else {
            up.stderr.trim().to_string()
        };
        return Err(StepFailure::new(format!("Container build/start failed: {detail}")));
    }
    log.push("Containers started.");

    match probes::http_probe(ports.shell, &config.host, port).await {
        Some(status) => log.push(format!("Health check: HTTP {status} on port {port}.")),
        None => log.push(format!(
            "Health check: port {port} not responding yet (app may still be starting)."
        )),
    }

    let url = bind_domain(ports, config, port, log).await;
    log.blank();
    log.push(format!("{label} '{}' deployed successfully.", config.name));
    push_hints(
        log,
        config,
        &[
            format!("cd {dir} && docker compose logs -f"),
            format!("cd {dir} && docker compose restart"),
            format!("cd {dir} && docker compose down"),
        ],
    );
    Ok(url)
}
