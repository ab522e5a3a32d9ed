//! siteship CLI - push a local project to a VPS and expose it publicly

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use siteship_cli::cli::Cli;
use siteship_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let as_json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if as_json {
                match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
