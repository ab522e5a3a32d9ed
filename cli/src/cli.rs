//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::output::{HumanRenderer, OutputContext, Renderer, no_color_requested};

/// Push a local project to a VPS and expose it publicly
#[derive(Parser)]
#[command(name = "siteship", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also set by a non-empty `NO_COLOR`)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// SSH alias of the target host (default: `default_host` from config)
    #[arg(long, global = true, env = "SITESHIP_HOST")]
    pub host: Option<String>,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// `None` prints help and exits with code 2.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect the project type and recommended strategy
    Analyze(commands::analyze::AnalyzeArgs),

    /// Deploy a local project to the host
    Deploy(commands::deploy::DeployArgs),

    /// Configure a public domain for a port on the host
    Domain(commands::domain::DomainArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid input, an unusable config file, or a
    /// failed local operation. Remote failures are rendered and reported
    /// through the exit code instead.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            host,
            yes,
            command,
            ..
        } = self;
        let no_color = no_color || no_color_requested(std::env::var_os("NO_COLOR").as_deref());
        let Some(command) = command else {
            eprintln!("{}", Cli::command().render_help());
            return Ok(ExitCode::from(2));
        };

        if let Command::Version = command {
            let ctx = OutputContext::new(no_color, quiet);
            let renderer = if json {
                Renderer::Json
            } else {
                Renderer::Human(HumanRenderer::new(&ctx))
            };
            commands::version::run(&renderer)?;
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, host },
        })?;

        match command {
            Command::Analyze(args) => commands::analyze::run(&app, &args),
            Command::Deploy(args) => commands::deploy::run(&app, args).await,
            Command::Domain(args) => commands::domain::run(&app, &args).await,
            Command::Version => Ok(ExitCode::SUCCESS),
        }
    }
}
