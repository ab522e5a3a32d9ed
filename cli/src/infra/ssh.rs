//! Infrastructure implementation of the `RemoteShell` port over `ssh`.

use std::time::Duration;

use crate::application::ports::{CommandRunner, RemoteOutput, RemoteShell};
use crate::domain::HostRef;
use crate::infra::command_runner::into_remote_output;

/// Seconds `ssh` waits for the TCP connection before giving up.
pub const CONNECT_TIMEOUT_SECS: u32 = 10;

/// Runs commands as `ssh -o ConnectTimeout=10 <alias> <command>`.
///
/// Authentication and host details come from the user's ssh config; the
/// alias is validated by [`HostRef`] so it cannot be read as an option.
pub struct SshShell<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SshShell<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

fn ssh_args<'a>(connect_opt: &'a str, host: &'a HostRef, command: &'a str) -> [&'a str; 4] {
    ["-o", connect_opt, host.as_str(), command]
}

impl<R: CommandRunner> RemoteShell for SshShell<R> {
    async fn exec(&self, host: &HostRef, command: &str, timeout: Duration) -> RemoteOutput {
        tracing::debug!(host = %host, command, timeout_secs = timeout.as_secs(), "ssh exec");
        let connect_opt = format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}");
        let out = into_remote_output(
            self.runner
                .run_with_timeout("ssh", &ssh_args(&connect_opt, host, command), timeout)
                .await,
        );
        tracing::debug!(host = %host, code = out.exit_code, "ssh exec finished");
        out
    }

    async fn exec_with_stdin(
        &self,
        host: &HostRef,
        command: &str,
        input: &str,
        timeout: Duration,
    ) -> RemoteOutput {
        tracing::debug!(host = %host, command, bytes = input.len(), "ssh exec with stdin");
        let connect_opt = format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}");
        into_remote_output(
            self.runner
                .run_with_stdin(
                    "ssh",
                    &ssh_args(&connect_opt, host, command),
                    input.as_bytes(),
                    timeout,
                )
                .await,
        )
    }
}
