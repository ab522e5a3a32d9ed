//! `siteship domain`: bind a public domain to a port already serving on the host.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use siteship_common::{DomainMode, DomainResult};

use crate::app::AppContext;
use crate::application::services::domain_binding;
use crate::commands::parse_port;
use crate::domain::validate::{AUTO_DOMAIN, is_auto_domain, validate_domain};
use crate::domain::{DeployLog, HostRef, ValidationError};
use crate::output::{Renderer, json};

/// Arguments for the domain command.
#[derive(Args)]
pub struct DomainArgs {
    /// Port the app listens on
    #[arg(long, value_parser = parse_port)]
    pub port: u16,

    /// Binding mode
    #[arg(long, value_enum, default_value_t = DomainMode::Subdomain)]
    pub mode: DomainMode,

    /// Domain name, or `auto` for an assigned subdomain
    #[arg(long, default_value = AUTO_DOMAIN)]
    pub domain: String,
}

/// JSON shape: the binding outcome plus any setup messages.
#[derive(Serialize)]
struct DomainReport<'a> {
    #[serde(flatten)]
    result: &'a DomainResult,
    lines: &'a [String],
}

/// Run the domain command.
///
/// # Errors
///
/// Returns an error for an invalid host alias or domain.
pub async fn run(app: &AppContext, args: &DomainArgs) -> Result<ExitCode> {
    let host = HostRef::parse(&app.host)?;
    let domain = Some(args.domain.as_str());
    if !is_auto_domain(domain) {
        validate_domain(&args.domain)?;
    }
    if args.mode == DomainMode::Proxy && is_auto_domain(domain) {
        return Err(ValidationError::MissingDomain.into());
    }

    let mut log = DeployLog::new();
    let result = domain_binding::resolve(
        &app.shell,
        &app.scripts,
        &host,
        args.mode,
        domain,
        args.port,
        app.config.timeouts().probe,
        &mut log,
    )
    .await;

    match app.renderer() {
        Renderer::Human(r) => {
            for line in log.lines() {
                app.output.info(line);
            }
            r.render_domain(&result);
        }
        Renderer::Json => json::print(&DomainReport {
            result: &result,
            lines: log.lines(),
        })?,
    }
    Ok(if result.ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
