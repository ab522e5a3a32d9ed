//! Subdomain, proxy and local-only binding.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use siteship_cli::application::ports::RemoteOutput;
use siteship_cli::application::services::domain_binding::{bind_proxy, bind_subdomain, resolve};
use siteship_cli::domain::{DeployLog, HostRef, ToolboxScript};
use siteship_common::DomainMode;

use crate::mocks::{RecordingScripts, RecordingShell};

const PROBE: Duration = Duration::from_secs(10);

fn host() -> HostRef {
    HostRef::parse("mikrus").unwrap()
}

// ── Subdomain ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn auto_subdomain_takes_url_from_registrar_output() {
    let scripts = RecordingScripts::all().with(
        ToolboxScript::SubdomainRegistrar,
        RemoteOutput::ok("Registering...\nReady: https://x7k2.byst.re\n"),
    );

    let result = bind_subdomain(&scripts, &host(), 3000, Some("auto")).await;

    assert!(result.ok());
    assert_eq!(result.url(), Some("https://x7k2.byst.re"));
    assert_eq!(result.domain(), Some("x7k2.byst.re"));
    assert_eq!(scripts.calls()[0].args, ["-", "3000", "mikrus"]);
}

#[tokio::test]
async fn explicit_subdomain_is_used_when_output_has_no_url() {
    let scripts = RecordingScripts::all();

    let result = bind_subdomain(&scripts, &host(), 8080, Some("shop.byst.re")).await;

    assert!(result.ok());
    assert_eq!(result.url(), Some("https://shop.byst.re"));
    assert_eq!(scripts.calls()[0].args, ["shop.byst.re", "8080", "mikrus"]);
}

#[tokio::test]
async fn auto_subdomain_without_reported_url_fails() {
    let scripts = RecordingScripts::all();

    let result = bind_subdomain(&scripts, &host(), 3000, None).await;

    assert!(!result.ok());
    assert!(result.error().unwrap().contains("did not report"));
}

#[tokio::test]
async fn registrar_failure_carries_its_output() {
    let scripts = RecordingScripts::all().with(
        ToolboxScript::SubdomainRegistrar,
        RemoteOutput {
            stdout: "Subdomain already taken\n".into(),
            stderr: String::new(),
            exit_code: 1,
        },
    );

    let result = bind_subdomain(&scripts, &host(), 3000, Some("taken.byst.re")).await;

    assert!(!result.ok());
    assert_eq!(result.error(), Some("Subdomain already taken"));
    assert_eq!(result.url(), None);
}

#[tokio::test]
async fn missing_registrar_is_reported_without_running() {
    let scripts = RecordingScripts::empty();

    let result = bind_subdomain(&scripts, &host(), 3000, None).await;

    assert!(!result.ok());
    assert!(result.error().unwrap().contains("local/cytrus-domain.sh"));
    assert!(scripts.calls().is_empty());
}

// ── Proxy ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn proxy_installs_runtime_then_binds() {
    let shell = RecordingShell::new().on("command -v mikrus-expose", RemoteOutput::failed(1, ""));
    let scripts = RecordingScripts::all();
    let mut log = DeployLog::new();

    let result = resolve(
        &shell,
        &scripts,
        &host(),
        DomainMode::Proxy,
        Some("app.example.com"),
        3000,
        PROBE,
        &mut log,
    )
    .await;

    let install = shell.calls().into_iter().find(|c| c.command == "bash -s").unwrap();
    assert_eq!(install.stdin.as_deref(), Some("# system/caddy-install.sh\n"));
    assert!(log.lines().iter().any(|l| l == "Installing reverse proxy..."));
    // The bind command starts with the same check, so it fails too.
    assert!(!result.ok());
    assert!(result.error().unwrap().starts_with("mikrus-expose failed or not found."));
    assert_eq!(result.domain(), Some("app.example.com"));
    assert_eq!(scripts.calls()[0].script, ToolboxScript::DnsRecord);
}

#[tokio::test]
async fn proxy_binds_when_runtime_present() {
    let shell = RecordingShell::new();
    let scripts = RecordingScripts::all();
    let mut log = DeployLog::new();

    let result = resolve(
        &shell,
        &scripts,
        &host(),
        DomainMode::Proxy,
        Some("app.example.com"),
        3000,
        PROBE,
        &mut log,
    )
    .await;

    assert!(result.ok());
    assert_eq!(result.url(), Some("https://app.example.com"));
    assert!(shell.ran("mikrus-expose 'app.example.com' '3000'"));
    assert!(!shell.ran("bash -s"));
    assert!(log.lines().is_empty());
}

#[tokio::test]
async fn dns_failure_does_not_block_binding() {
    let shell = RecordingShell::new();
    let scripts =
        RecordingScripts::all().with(ToolboxScript::DnsRecord, RemoteOutput::failed(1, "no zone"));

    let result = bind_proxy(&shell, &scripts, &host(), "app.example.com", 3000).await;

    assert!(result.ok());
    assert_eq!(scripts.calls()[0].args, ["app.example.com", "mikrus"]);
}

#[tokio::test]
async fn proxy_rejects_bad_domain_before_any_call() {
    let shell = RecordingShell::new();
    let scripts = RecordingScripts::all();

    let result = bind_proxy(&shell, &scripts, &host(), "evil.com; rm -rf /", 3000).await;

    assert!(!result.ok());
    assert!(shell.calls().is_empty());
    assert!(scripts.calls().is_empty());
}

#[tokio::test]
async fn proxy_mode_without_domain_fails() {
    let shell = RecordingShell::new();
    let scripts = RecordingScripts::all();
    let mut log = DeployLog::new();

    let result = resolve(&shell, &scripts, &host(), DomainMode::Proxy, Some("auto"), 3000, PROBE, &mut log)
        .await;

    assert!(!result.ok());
    assert!(shell.calls().is_empty());
}

// ── Local only ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn local_only_points_at_localhost() {
    let shell = RecordingShell::new();
    let scripts = RecordingScripts::empty();
    let mut log = DeployLog::new();

    let result = resolve(&shell, &scripts, &host(), DomainMode::LocalOnly, None, 4100, PROBE, &mut log)
        .await;

    assert!(result.ok());
    assert_eq!(result.url(), Some("http://localhost:4100"));
    assert!(shell.calls().is_empty());
}
