//! Local process execution for `ssh`, `rsync` and toolbox scripts.
//!
//! Every child gets a hard deadline and is killed when it passes, so a hung
//! connection can never stall a deployment.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::application::ports::{CommandRunner, EXIT_SPAWN_FAILED, EXIT_TIMED_OUT, RemoteOutput};

/// A process was killed because it exceeded its deadline.
#[derive(Debug, Error)]
#[error("{program} timed out after {secs}s")]
pub struct TimedOut {
    pub program: String,
    pub secs: u64,
}

/// Production `CommandRunner`: tokio processes with an explicit kill on timeout.
///
/// `tokio::time::timeout` around `.output().await` only drops the future;
/// `tokio::select!` with `child.kill()` guarantees the process is terminated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

async fn read_all<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

async fn wait_with_deadline(
    mut child: tokio::process::Child,
    program: &str,
    timeout: Duration,
) -> Result<Output> {
    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    tokio::select! {
        result = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                read_all(stdout_handle),
                read_all(stderr_handle),
            );
            Ok(Output {
                status: status.with_context(|| format!("waiting for {program}"))?,
                stdout,
                stderr,
            })
        } => result,
        () = tokio::time::sleep(timeout) => {
            let _ = child.kill().await;
            Err(TimedOut { program: program.to_string(), secs: timeout.as_secs() }.into())
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        wait_with_deadline(child, program, timeout).await
    }

    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdin_handle = child.stdin.take();
        let input_owned = input.to_vec();
        let stdin_task = tokio::spawn(async move {
            if let Some(mut stdin) = stdin_handle {
                let _ = stdin.write_all(&input_owned).await;
            }
        });

        let result = wait_with_deadline(child, program, timeout).await;
        let _ = stdin_task.await;
        result
    }
}

/// Fold a runner result into a [`RemoteOutput`].
///
/// Timeouts become exit code 124 and spawn failures 255, with the error
/// message as stderr.
#[must_use]
pub fn into_remote_output(result: Result<Output>) -> RemoteOutput {
    match result {
        Ok(output) => RemoteOutput::from_output(&output),
        Err(e) if e.downcast_ref::<TimedOut>().is_some() => {
            RemoteOutput::failed(EXIT_TIMED_OUT, e.to_string())
        }
        Err(e) => RemoteOutput::failed(EXIT_SPAWN_FAILED, format!("{e:#}")),
    }
}
