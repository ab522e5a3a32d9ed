//! Infrastructure implementation of the `DirectorySync` port over `rsync`.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{CommandRunner, DirectorySync, RemoteOutput};
use crate::domain::HostRef;
use crate::infra::command_runner::into_remote_output;
use crate::infra::ssh::CONNECT_TIMEOUT_SECS;

/// Mirror-sync with `rsync -avz --delete` over ssh.
pub struct RsyncSync<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> RsyncSync<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

/// Full rsync argument list. Trailing slashes copy directory contents
/// rather than the directory itself.
#[must_use]
pub fn rsync_args(host: &HostRef, local: &Path, remote: &str, excludes: &[&str]) -> Vec<String> {
    let mut src = local.display().to_string();
    if !src.ends_with('/') {
        src.push('/');
    }
    let mut dest = format!("{host}:{remote}");
    if !dest.ends_with('/') {
        dest.push('/');
    }

    let mut args = vec!["-avz".to_string(), "--delete".to_string()];
    for pattern in excludes {
        args.push("--exclude".to_string());
        args.push((*pattern).to_string());
    }
    args.push("-e".to_string());
    args.push(format!("ssh -o ConnectTimeout={CONNECT_TIMEOUT_SECS}"));
    args.push(src);
    args.push(dest);
    args
}

impl<R: CommandRunner> DirectorySync for RsyncSync<R> {
    async fn mirror(
        &self,
        host: &HostRef,
        local: &Path,
        remote: &str,
        excludes: &[&str],
        timeout: Duration,
    ) -> RemoteOutput {
        let args = rsync_args(host, local, remote, excludes);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::info!(host = %host, local = %local.display(), remote, "mirroring project");
        let out = into_remote_output(self.runner.run_with_timeout("rsync", &arg_refs, timeout).await);
        tracing::debug!(code = out.exit_code, "rsync finished");
        out
    }
}
