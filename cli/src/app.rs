//! Application context: unified state passed to every command handler.
//!
//! `AppContext` resolves the config file, the host alias and the toolbox
//! location once, and owns the production adapters the services run against.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::deploy::DeployPorts;
use crate::domain::config::resolve_toolbox_root;
use crate::domain::{SiteshipConfig, ToolboxPaths};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::project_fs::LocalProjectInspector;
use crate::infra::rsync::RsyncSync;
use crate::infra::scripts::LocalToolbox;
use crate::infra::ssh::SshShell;
use crate::output::{HumanRenderer, OutputContext, Renderer};

/// Environment variable pointing at a toolbox checkout.
pub const TOOLBOX_ENV: &str = "SITESHIP_TOOLBOX_PATH";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `SITESHIP_YES` env vars).
    pub yes: bool,
    /// Host alias from `--host` / `SITESHIP_HOST`.
    pub host: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Whether prompts should be skipped.
#[must_use]
pub fn is_non_interactive(yes: bool, ci_set: bool, siteship_yes_set: bool) -> bool {
    yes || ci_set || siteship_yes_set
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loaded user configuration.
    pub config: SiteshipConfig,
    /// Host alias every remote call targets.
    pub host: String,
    /// Remote shell over ssh.
    pub shell: SshShell<TokioCommandRunner>,
    /// Mirror-sync over rsync.
    pub sync: RsyncSync<TokioCommandRunner>,
    /// Toolbox scripts rooted at the resolved checkout.
    pub scripts: LocalToolbox<TokioCommandRunner>,
    /// Local project reader.
    pub inspector: LocalProjectInspector,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `SITESHIP_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is unreadable or invalid.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let store = YamlConfigStore::from_env()?;
        let config = store.load().context("loading configuration")?;

        let toolbox_root = resolve_toolbox_root(
            std::env::var_os(TOOLBOX_ENV).map(PathBuf::from).as_deref(),
            config.toolbox_root.as_deref(),
            dirs::home_dir().as_deref(),
            std::path::Path::is_file,
        );
        match &toolbox_root {
            Some(root) => tracing::debug!(root = %root.display(), "toolbox resolved"),
            None => tracing::debug!("no toolbox checkout found"),
        }

        let non_interactive = is_non_interactive(
            flags.behaviour.yes,
            std::env::var_os("CI").is_some(),
            std::env::var_os("SITESHIP_YES").is_some(),
        );
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let host = flags
            .behaviour
            .host
            .clone()
            .unwrap_or_else(|| config.default_host.clone());

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            host,
            shell: SshShell::new(TokioCommandRunner::new()),
            sync: RsyncSync::new(TokioCommandRunner::new()),
            scripts: LocalToolbox::new(TokioCommandRunner::new(), ToolboxPaths::new(toolbox_root)),
            inspector: LocalProjectInspector,
            config,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json,
        }
    }

    /// Collaborators for the deploy pipelines.
    #[must_use]
    pub fn deploy_ports(
        &self,
    ) -> DeployPorts<'_, SshShell<TokioCommandRunner>, RsyncSync<TokioCommandRunner>, LocalToolbox<TokioCommandRunner>>
    {
        DeployPorts {
            shell: &self.shell,
            sync: &self.sync,
            scripts: &self.scripts,
            timeouts: self.config.timeouts(),
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `SITESHIP_YES`
    /// env), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
