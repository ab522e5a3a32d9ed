//! `siteship analyze`: classify a local project without touching the host.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use siteship_common::ProjectAnalysis;

use crate::app::AppContext;
use crate::application::ports::ProjectInspector;
use crate::application::services::classify::classify;
use crate::application::services::deploy_site::derive_name;
use crate::domain::{AppName, ValidationError};
use crate::output::{Renderer, json};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// App name (default: directory name)
    #[arg(long)]
    pub name: Option<String>,
}

/// JSON shape: the analysis plus the sanitized app name.
#[derive(Serialize)]
pub struct AnalysisReport<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub analysis: &'a ProjectAnalysis,
}

/// Print an analysis in the active output mode.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(app: &AppContext, name: &AppName, analysis: &ProjectAnalysis) -> Result<()> {
    match app.renderer() {
        Renderer::Human(r) => {
            r.render_analysis(name, analysis);
            app.output.info(
                "To deploy, run `siteship deploy <path> --domain-mode <subdomain|proxy|local-only>`.",
            );
            Ok(())
        }
        Renderer::Json => json::print(&AnalysisReport {
            name: name.as_str(),
            analysis,
        }),
    }
}

/// Run the analyze command.
///
/// # Errors
///
/// Returns an error if the path is not a directory or no valid name can be
/// derived.
pub fn run(app: &AppContext, args: &AnalyzeArgs) -> Result<ExitCode> {
    let path = std::path::absolute(&args.path)
        .with_context(|| format!("cannot resolve {}", args.path.display()))?;
    if !app.inspector.is_dir(&path) {
        return Err(ValidationError::NotADirectory(path.display().to_string()).into());
    }
    let name = derive_name(args.name.as_deref(), &path)?;
    let analysis = classify(&app.inspector, &path);
    render(app, &name, &analysis)?;
    Ok(ExitCode::SUCCESS)
}
