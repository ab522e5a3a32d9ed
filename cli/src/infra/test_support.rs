//! Shared test helpers for infra adapter tests.
//!
//! Provides cross-platform `exit_status()` and a `CommandRunner` that records
//! every invocation and replies with a canned `Output`.

#![allow(clippy::unwrap_used)]

use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::CommandRunner;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub timeout: Duration,
}

/// `CommandRunner` that records calls and always returns `reply`.
pub struct RecordingRunner {
    reply: (i32, String, String),
    pub calls: Mutex<Vec<Call>>,
}

impl RecordingRunner {
    pub fn replying(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            reply: (code, stdout.to_string(), stderr.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[allow(clippy::unwrap_used)]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    #[allow(clippy::unwrap_used)]
    fn record(&self, program: &str, args: &[&str], stdin: Option<&[u8]>, timeout: Duration) -> Output {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            stdin: stdin.map(|s| String::from_utf8_lossy(s).into_owned()),
            timeout,
        });
        let (code, stdout, stderr) = &self.reply;
        output(*code, stdout, stderr)
    }
}

impl CommandRunner for RecordingRunner {
    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        Ok(self.record(program, args, None, timeout))
    }

    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
        timeout: Duration,
    ) -> Result<Output> {
        Ok(self.record(program, args, Some(input), timeout))
    }
}
