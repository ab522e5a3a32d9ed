//! `siteship deploy`: push a local project to the host and expose it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, ValueEnum};
use siteship_common::{DomainMode, Strategy};

use crate::app::AppContext;
use crate::application::services::deploy_site::{DeployRequest, deploy_site, prepare};
use crate::commands::{analyze, parse_port};
use crate::domain::DeployError;
use crate::domain::validate::parse_env_pair;
use crate::output::{OutputContext, Renderer, TerminalReporter, json};

/// `--strategy` values. `auto` follows the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Auto,
    Static,
    #[value(alias = "node")]
    ProcessManaged,
    #[value(alias = "docker")]
    Container,
}

impl StrategyArg {
    /// `None` for `auto`.
    #[must_use]
    pub fn explicit(self) -> Option<Strategy> {
        match self {
            Self::Auto => None,
            Self::Static => Some(Strategy::Static),
            Self::ProcessManaged => Some(Strategy::ProcessManaged),
            Self::Container => Some(Strategy::Container),
        }
    }
}

/// Arguments for the deploy command.
#[derive(Args)]
pub struct DeployArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// App name, used for remote directories and process names (default: directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Deployment strategy
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,

    /// How the app is exposed publicly
    #[arg(long, value_enum, default_value_t = DomainMode::LocalOnly)]
    pub domain_mode: DomainMode,

    /// Domain name, or `auto` for an assigned subdomain
    #[arg(long)]
    pub domain: Option<String>,

    /// Override the detected port
    #[arg(long, value_parser = parse_port)]
    pub port: Option<u16>,

    /// Override the start command (process-managed strategy)
    #[arg(long)]
    pub start_command: Option<String>,

    /// Override the install command (process-managed strategy)
    #[arg(long)]
    pub install_command: Option<String>,

    /// Environment variable for the app, as KEY=VALUE (repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair, action = ArgAction::Append)]
    pub env: Vec<(String, String)>,

    /// Only show the analysis; do not deploy
    #[arg(long)]
    pub analyze_only: bool,
}

impl DeployArgs {
    fn into_request(self, project_path: PathBuf, host: String) -> DeployRequest {
        DeployRequest {
            project_path,
            name: self.name,
            host,
            strategy: self.strategy.explicit(),
            domain_mode: self.domain_mode,
            domain: self.domain,
            port: self.port,
            start_command: self.start_command,
            install_command: self.install_command,
            env_vars: self.env.into_iter().collect(),
        }
    }
}

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error for invalid input, a project that must be built first,
/// or a declined confirmation. A failed remote step is rendered and reported
/// through the exit code.
pub async fn run(app: &AppContext, args: DeployArgs) -> Result<ExitCode> {
    let path = std::path::absolute(&args.path)
        .with_context(|| format!("cannot resolve {}", args.path.display()))?;
    let analyze_only = args.analyze_only;
    let prepared = prepare(&app.inspector, args.into_request(path, app.host.clone()))?;

    if analyze_only {
        analyze::render(app, &prepared.config.name, &prepared.analysis)?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Renderer::Human(r) = app.renderer() {
        r.render_plan(&prepared.config);
    }
    let prompt = format!(
        "Deploy '{}' to {}?",
        prepared.config.name, prepared.config.host
    );
    if !app.confirm(&prompt, true).unwrap_or(false) {
        return Err(DeployError::NotConfirmed.into());
    }

    // JSON mode keeps stdout for the result document.
    let silent = OutputContext::with_tty(true, true, false);
    let progress_ctx = if app.is_json() { &silent } else { &app.output };
    let reporter = TerminalReporter::with_spinner(progress_ctx, "Preparing deployment...");

    let result = deploy_site(&app.deploy_ports(), &prepared, &reporter).await?;
    if result.ok {
        reporter.finish(true, "Deployment finished");
    } else {
        reporter.finish(false, "Deployment failed");
    }
    tracing::info!(name = %prepared.config.name, ok = result.ok, "deploy finished");

    match app.renderer() {
        Renderer::Human(r) => r.render_deploy(&result),
        Renderer::Json => json::print(&result)?,
    }
    Ok(if result.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
