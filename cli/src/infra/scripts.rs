//! Infrastructure implementation of the `ToolboxScripts` port.
//!
//! Scripts live in a local mikrus-toolbox checkout. Registrar and hosting
//! scripts run locally under `bash`; install scripts are read and piped to
//! the host by the application layer.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, EXIT_SPAWN_FAILED, RemoteOutput, ToolboxScripts};
use crate::domain::config::missing_script_message;
use crate::domain::{ToolboxPaths, ToolboxScript};
use crate::infra::command_runner::into_remote_output;

/// Toolbox rooted at an explicitly resolved directory.
pub struct LocalToolbox<R: CommandRunner> {
    runner: R,
    paths: ToolboxPaths,
}

impl<R: CommandRunner> LocalToolbox<R> {
    pub fn new(runner: R, paths: ToolboxPaths) -> Self {
        Self { runner, paths }
    }
}

impl<R: CommandRunner> ToolboxScripts for LocalToolbox<R> {
    fn is_available(&self, script: ToolboxScript) -> bool {
        self.paths.script_path(script).is_some_and(|p| p.is_file())
    }

    fn read(&self, script: ToolboxScript) -> Result<String> {
        let path = self
            .paths
            .script_path(script)
            .ok_or_else(|| anyhow::anyhow!(missing_script_message(script)))?;
        std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path.display()))
    }

    async fn run(&self, script: ToolboxScript, args: &[&str], timeout: Duration) -> RemoteOutput {
        let Some(path) = self.paths.script_path(script).filter(|p| p.is_file()) else {
            return RemoteOutput::failed(EXIT_SPAWN_FAILED, missing_script_message(script));
        };
        let path = path.display().to_string();
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(path.as_str());
        full_args.extend_from_slice(args);

        tracing::info!(script = script.relative_path(), ?args, "running toolbox script");
        let out = into_remote_output(self.runner.run_with_timeout("bash", &full_args, timeout).await);
        tracing::debug!(script = script.relative_path(), code = out.exit_code, "toolbox script finished");
        out
    }
}
