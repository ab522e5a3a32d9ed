//! Hand-written recording mocks of the application ports.
//!
//! Each mock records every call and answers from a small script so tests can
//! assert both the outcome and the exact remote commands issued.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use siteship_cli::application::ports::{
    DirectorySync, ProgressReporter, RemoteOutput, RemoteShell, ToolboxScripts,
};
use siteship_cli::domain::{HostRef, ToolboxScript};

// ── RemoteShell ───────────────────────────────────────────────────────────────

/// One command sent to the host.
#[derive(Debug, Clone)]
pub struct ShellCall {
    pub command: String,
    pub stdin: Option<String>,
    pub timeout: Duration,
}

/// Answers each command with the first rule whose pattern it contains.
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct RecordingShell {
    rules: Vec<(String, RemoteOutput)>,
    calls: Mutex<Vec<ShellCall>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on(mut self, pattern: &str, reply: RemoteOutput) -> Self {
        self.rules.push((pattern.to_string(), reply));
        self
    }

    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.command).collect()
    }

    /// Whether any issued command contains `needle`.
    pub fn ran(&self, needle: &str) -> bool {
        self.commands().iter().any(|c| c.contains(needle))
    }

    fn answer(&self, command: &str, stdin: Option<&str>, timeout: Duration) -> RemoteOutput {
        self.calls.lock().unwrap().push(ShellCall {
            command: command.to_string(),
            stdin: stdin.map(str::to_string),
            timeout,
        });
        self.rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_default()
    }
}

impl RemoteShell for RecordingShell {
    async fn exec(&self, _host: &HostRef, command: &str, timeout: Duration) -> RemoteOutput {
        self.answer(command, None, timeout)
    }

    async fn exec_with_stdin(
        &self,
        _host: &HostRef,
        command: &str,
        input: &str,
        timeout: Duration,
    ) -> RemoteOutput {
        self.answer(command, Some(input), timeout)
    }
}

// ── DirectorySync ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SyncCall {
    pub local: PathBuf,
    pub remote: String,
    pub excludes: Vec<String>,
}

#[derive(Default)]
pub struct RecordingSync {
    reply: RemoteOutput,
    calls: Mutex<Vec<SyncCall>>,
}

impl RecordingSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            reply: RemoteOutput::failed(23, stderr),
            calls: Mutex::default(),
        }
    }

    pub fn calls(&self) -> Vec<SyncCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DirectorySync for RecordingSync {
    async fn mirror(
        &self,
        _host: &HostRef,
        local: &Path,
        remote: &str,
        excludes: &[&str],
        _timeout: Duration,
    ) -> RemoteOutput {
        self.calls.lock().unwrap().push(SyncCall {
            local: local.to_path_buf(),
            remote: remote.to_string(),
            excludes: excludes.iter().map(|e| (*e).to_string()).collect(),
        });
        self.reply.clone()
    }
}

// ── ToolboxScripts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ScriptCall {
    pub script: ToolboxScript,
    pub args: Vec<String>,
}

/// Toolbox with a chosen set of scripts present.
#[derive(Default)]
pub struct RecordingScripts {
    available: BTreeSet<&'static str>,
    replies: BTreeMap<&'static str, RemoteOutput>,
    calls: Mutex<Vec<ScriptCall>>,
}

impl RecordingScripts {
    /// No toolbox at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every script present, each succeeding with empty output.
    pub fn all() -> Self {
        let mut s = Self::default();
        for script in [
            ToolboxScript::SubdomainRegistrar,
            ToolboxScript::DnsRecord,
            ToolboxScript::StaticHosting,
            ToolboxScript::ProcessManagerSetup,
            ToolboxScript::ProxyInstall,
        ] {
            s.available.insert(script.relative_path());
        }
        s
    }

    #[must_use]
    pub fn with(mut self, script: ToolboxScript, reply: RemoteOutput) -> Self {
        self.available.insert(script.relative_path());
        self.replies.insert(script.relative_path(), reply);
        self
    }

    #[must_use]
    pub fn without(mut self, script: ToolboxScript) -> Self {
        self.available.remove(script.relative_path());
        self
    }

    pub fn calls(&self) -> Vec<ScriptCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ran(&self, script: ToolboxScript) -> bool {
        self.calls().iter().any(|c| c.script == script)
    }
}

impl ToolboxScripts for RecordingScripts {
    fn is_available(&self, script: ToolboxScript) -> bool {
        self.available.contains(script.relative_path())
    }

    fn read(&self, script: ToolboxScript) -> Result<String> {
        if self.is_available(script) {
            Ok(format!("# {}\n", script.relative_path()))
        } else {
            anyhow::bail!("missing {}", script.relative_path())
        }
    }

    async fn run(&self, script: ToolboxScript, args: &[&str], _timeout: Duration) -> RemoteOutput {
        self.calls.lock().unwrap().push(ScriptCall {
            script,
            args: args.iter().map(|a| (*a).to_string()).collect(),
        });
        if !self.is_available(script) {
            return RemoteOutput::failed(255, "missing");
        }
        self.replies
            .get(script.relative_path())
            .cloned()
            .unwrap_or_default()
    }
}

// ── ProgressReporter ──────────────────────────────────────────────────────────

/// Records progress messages instead of printing them.
#[derive(Default)]
pub struct RecordingReporter {
    pub steps: Mutex<Vec<String>>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.lock().unwrap().push(message.to_string());
    }
    fn success(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
