//! Seams between the deploy services and the outside world.
//!
//! The remote host, the local filesystem, the toolbox and the terminal are
//! each reached through one trait here. Only `crate::domain` is imported.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{HostRef, ProjectSnapshot, SiteshipConfig, ToolboxScript};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Synthetic exit code reported when a call exceeded its deadline.
pub const EXIT_TIMED_OUT: i32 = 124;

/// Synthetic exit code reported when a program could not be started.
pub const EXIT_SPAWN_FAILED: i32 = 255;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Captured result of a remote call. Failures are data, never `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RemoteOutput {
    /// Successful call with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed call with the given exit code and stderr.
    #[must_use]
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Convert a finished process. A signal death counts as a spawn-level failure.
    #[must_use]
    pub fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(EXIT_SPAWN_FAILED),
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Best diagnostic text: trimmed stderr, falling back to stdout.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

// ── Process Port ──────────────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration)
    -> Result<Output>;

    /// Run a program with stdin piped from `input`.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run_with_timeout`].
    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Remote Host Ports ─────────────────────────────────────────────────────────

/// Runs shell commands on the remote host. Never fails: spawn errors and
/// timeouts come back as a non-zero [`RemoteOutput::exit_code`].
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    async fn exec(&self, host: &HostRef, command: &str, timeout: Duration) -> RemoteOutput;

    /// Like [`RemoteShell::exec`], streaming `input` to the command's stdin.
    async fn exec_with_stdin(
        &self,
        host: &HostRef,
        command: &str,
        input: &str,
        timeout: Duration,
    ) -> RemoteOutput;
}

/// Mirrors a local directory to the host, deleting remote files that no
/// longer exist locally.
#[allow(async_fn_in_trait)]
pub trait DirectorySync {
    async fn mirror(
        &self,
        host: &HostRef,
        local: &Path,
        remote: &str,
        excludes: &[&str],
        timeout: Duration,
    ) -> RemoteOutput;
}

/// External toolbox scripts rooted at an explicitly resolved directory.
#[allow(async_fn_in_trait)]
pub trait ToolboxScripts {
    /// Whether the script exists in the resolved toolbox.
    fn is_available(&self, script: ToolboxScript) -> bool;

    /// Script source, for piping to the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the toolbox is missing or the file is unreadable.
    fn read(&self, script: ToolboxScript) -> Result<String>;

    /// Run a script locally with positional arguments.
    async fn run(&self, script: ToolboxScript, args: &[&str], timeout: Duration) -> RemoteOutput;
}

// ── Local Inspection Port ─────────────────────────────────────────────────────

/// Reads a local project directory into a [`ProjectSnapshot`].
pub trait ProjectInspector {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Never fails: unreadable paths produce an unreadable snapshot.
    fn snapshot(&self, path: &Path) -> ProjectSnapshot;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads the user configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SiteshipConfig>;
}
