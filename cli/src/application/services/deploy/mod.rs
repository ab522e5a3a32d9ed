//! Application service: strategy executor.
//!
//! [`execute`] picks a provisioning pipeline and runs it step by step against
//! the host. Each pipeline is written as a `StepResult` function so a failing
//! step short-circuits with `?`; [`finish`] then turns the outcome and the log
//! into a [`DeployResult`] with every line produced so far.

pub mod container;
pub mod probes;
pub mod process;
pub mod static_site;

use siteship_common::{DeployResult, ProjectAnalysis, ProjectType, Strategy};

use crate::application::ports::{DirectorySync, RemoteOutput, RemoteShell, ToolboxScripts};
use crate::application::services::domain_binding;
use crate::domain::classify::DOCKERFILE;
use crate::domain::deploy::SYNC_EXCLUDES;
use crate::domain::templates::{env_file, shell_quote};
use crate::domain::{DeployConfig, DeployLog, Timeouts};

// ── Collaborators ─────────────────────────────────────────────────────────────

/// Remote collaborators and deadlines shared by every pipeline.
pub struct DeployPorts<'a, S, Y, T> {
    pub shell: &'a S,
    pub sync: &'a Y,
    pub scripts: &'a T,
    pub timeouts: Timeouts,
}

// ── Step outcomes ─────────────────────────────────────────────────────────────

/// A terminal pipeline failure. The message becomes `DeployResult::error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure(pub String);

impl StepFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type StepResult<T = ()> = Result<T, StepFailure>;

/// Fail the step unless the remote call exited zero.
pub fn require(out: RemoteOutput, context: &str) -> StepResult<RemoteOutput> {
    if out.success() {
        Ok(out)
    } else {
        Err(StepFailure(format!("{context}: {}", out.diagnostic())))
    }
}

/// Close the log with the pipeline outcome.
#[must_use]
pub fn finish(log: DeployLog, outcome: StepResult<Option<String>>) -> DeployResult {
    match outcome {
        Ok(url) => log.succeed(url),
        Err(StepFailure(error)) => log.fail(error),
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Python projects without their own build file always take the
/// container-synthesis path.
#[must_use]
pub fn needs_container_synthesis(analysis: &ProjectAnalysis) -> bool {
    analysis.project_type == ProjectType::Python && !analysis.files.iter().any(|f| f == DOCKERFILE)
}

/// Run the pipeline selected by the analysis and `config.strategy`.
pub async fn execute<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    analysis: &ProjectAnalysis,
) -> DeployResult
where
    S: RemoteShell,
    Y: DirectorySync,
    T: ToolboxScripts,
{
    if needs_container_synthesis(analysis) {
        if config.strategy != Strategy::Container {
            tracing::info!(
                requested = %config.strategy,
                "python project without Dockerfile, overriding to container synthesis"
            );
        }
        return container::deploy_synthesized(ports, config).await;
    }
    tracing::info!(name = %config.name, host = %config.host, strategy = %config.strategy, "deploying");
    match config.strategy {
        Strategy::Static => static_site::deploy(ports, config).await,
        Strategy::ProcessManaged => process::deploy(ports, config).await,
        Strategy::Container => container::deploy(ports, config).await,
    }
}

// ── Shared steps ──────────────────────────────────────────────────────────────

/// Create `dir` on the host and hand it to the login user.
pub async fn ensure_owned_dir<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    dir: &str,
) -> StepResult
where
    S: RemoteShell,
{
    let dir = shell_quote(dir);
    let out = ports
        .shell
        .exec(
            &config.host,
            &format!("sudo mkdir -p {dir} && sudo chown -R $(whoami) {dir}"),
            ports.timeouts.probe,
        )
        .await;
    require(out, "Could not prepare remote directory").map(drop)
}

/// Mirror the project into `dir`.
pub async fn sync_project<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    dir: &str,
    log: &mut DeployLog,
) -> StepResult
where
    Y: DirectorySync,
{
    log.push(format!("Syncing files to {dir}..."));
    let out = ports
        .sync
        .mirror(&config.host, &config.project_path, dir, SYNC_EXCLUDES, ports.timeouts.sync)
        .await;
    require(out, "rsync failed")?;
    log.push("Files synced.");
    Ok(())
}

/// Write `content` to `path` on the host through stdin.
pub async fn write_remote_file<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    path: &str,
    content: &str,
) -> StepResult
where
    S: RemoteShell,
{
    let out = ports
        .shell
        .exec_with_stdin(
            &config.host,
            &format!("cat > {}", shell_quote(path)),
            content,
            ports.timeouts.probe,
        )
        .await;
    require(out, &format!("Could not write {path}")).map(drop)
}

/// Materialize `config.env_vars` as `<dir>/.env` when any were given.
pub async fn write_env_file<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    dir: &str,
    log: &mut DeployLog,
) -> StepResult
where
    S: RemoteShell,
{
    if config.env_vars.is_empty() {
        return Ok(());
    }
    write_remote_file(ports, config, &format!("{dir}/.env"), &env_file(&config.env_vars)).await?;
    log.push(format!("Wrote {} environment variable(s) to .env.", config.env_vars.len()));
    Ok(())
}

/// Bind the configured domain to `port`. Failures only add a warning line.
pub async fn bind_domain<S, Y, T>(
    ports: &DeployPorts<'_, S, Y, T>,
    config: &DeployConfig,
    port: u16,
    log: &mut DeployLog,
) -> Option<String>
where
    S: RemoteShell,
    T: ToolboxScripts,
{
    let result = domain_binding::resolve(
        ports.shell,
        ports.scripts,
        &config.host,
        config.domain_mode,
        config.domain.as_deref(),
        port,
        ports.timeouts.probe,
        log,
    )
    .await;
    log.push_domain_result(&result);
    if result.ok() {
        result.url().map(str::to_string)
    } else {
        None
    }
}

/// Append `ssh` one-liners for managing the deployed app.
pub fn push_hints(log: &mut DeployLog, config: &DeployConfig, commands: &[String]) {
    log.blank();
    log.push("Management commands:");
    for command in commands {
        log.push(format!("  ssh {} \"{command}\"", config.host));
    }
}
