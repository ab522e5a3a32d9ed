//! Version command

use serde::Serialize;

use crate::output::{Renderer, json};

#[derive(Serialize)]
struct VersionReport<'a> {
    version: &'a str,
}

/// Run the version command.
///
/// # Errors
///
/// Returns an error if the JSON report cannot be serialized.
pub fn run(renderer: &Renderer<'_>) -> anyhow::Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    match renderer {
        Renderer::Human(r) => r.render_version(version),
        Renderer::Json => json::print(&VersionReport { version })?,
    }
    Ok(())
}
