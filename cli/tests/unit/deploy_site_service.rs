//! `prepare` validation and the `deploy_site` wrapper.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use siteship_cli::application::ports::RemoteOutput;
use siteship_cli::application::services::deploy_site::{
    DeployRequest, deploy_site, derive_name, prepare,
};
use siteship_cli::domain::{DeployError, ValidationError};
use siteship_cli::infra::project_fs::LocalProjectInspector;
use siteship_common::{DomainMode, Strategy};

use crate::helpers::{ports, project};
use crate::mocks::{RecordingReporter, RecordingScripts, RecordingShell, RecordingSync};

fn request(path: &std::path::Path) -> DeployRequest {
    DeployRequest {
        project_path: path.to_path_buf(),
        host: "mikrus".into(),
        ..DeployRequest::default()
    }
}

fn validation(err: &anyhow::Error) -> &ValidationError {
    err.downcast_ref::<ValidationError>().expect("validation error")
}

// ── prepare ───────────────────────────────────────────────────────────────────

#[test]
fn rejects_host_that_looks_like_an_option() {
    let dir = project(&[("index.html", "")]);
    let mut req = request(dir.path());
    req.host = "-oProxyCommand=x".into();
    let err = prepare(&LocalProjectInspector, req).unwrap_err();
    assert!(matches!(validation(&err), ValidationError::InvalidHost(_)));
}

#[test]
fn rejects_missing_project_directory() {
    let dir = project(&[]);
    let req = request(&dir.path().join("nope"));
    let err = prepare(&LocalProjectInspector, req).unwrap_err();
    assert!(matches!(validation(&err), ValidationError::NotADirectory(_)));
}

#[test]
fn rejects_malformed_domain() {
    let dir = project(&[("index.html", "")]);
    let mut req = request(dir.path());
    req.domain_mode = DomainMode::Subdomain;
    req.domain = Some("bad..example.com".into());
    let err = prepare(&LocalProjectInspector, req).unwrap_err();
    assert!(matches!(validation(&err), ValidationError::InvalidDomain(_)));
}

#[test]
fn proxy_mode_needs_an_explicit_domain() {
    let dir = project(&[("index.html", "")]);
    for domain in [None, Some("auto"), Some("-")] {
        let mut req = request(dir.path());
        req.domain_mode = DomainMode::Proxy;
        req.domain = domain.map(str::to_string);
        let err = prepare(&LocalProjectInspector, req).unwrap_err();
        assert!(matches!(validation(&err), ValidationError::MissingDomain));
    }
}

#[test]
fn analysis_fills_unset_fields() {
    let dir = project(&[
        ("package.json", r#"{"scripts":{"start":"node index.js"}}"#),
        (".env.example", "PORT=4100\n"),
    ]);
    let prepared = prepare(&LocalProjectInspector, request(dir.path())).unwrap();
    let cfg = prepared.config;
    assert_eq!(cfg.strategy, Strategy::ProcessManaged);
    assert_eq!(cfg.port, Some(4100));
    assert_eq!(cfg.start_command.as_deref(), Some("node index.js"));
    assert_eq!(cfg.domain_mode, DomainMode::LocalOnly);
}

#[test]
fn explicit_values_win_over_analysis() {
    let dir = project(&[("package.json", r#"{"scripts":{"start":"node index.js"}}"#)]);
    let mut req = request(dir.path());
    req.port = Some(5000);
    req.strategy = Some(Strategy::Container);
    req.start_command = Some("node dist/main.js".into());
    let cfg = prepare(&LocalProjectInspector, req).unwrap().config;
    assert_eq!(cfg.strategy, Strategy::Container);
    assert_eq!(cfg.port, Some(5000));
    assert_eq!(cfg.start_command.as_deref(), Some("node dist/main.js"));
}

#[test]
fn strategy_override_picks_its_default_port() {
    let dir = project(&[("index.html", "")]);
    let mut req = request(dir.path());
    req.strategy = Some(Strategy::Container);
    let cfg = prepare(&LocalProjectInspector, req).unwrap().config;
    assert_eq!(cfg.port, Some(3000));

    let cfg = prepare(&LocalProjectInspector, request(dir.path())).unwrap().config;
    assert_eq!(cfg.strategy, Strategy::Static);
    assert_eq!(cfg.port, None);
}

#[test]
fn name_is_sanitized() {
    let dir = project(&[("index.html", "")]);
    let mut req = request(dir.path());
    req.name = Some("My Shop!".into());
    let cfg = prepare(&LocalProjectInspector, req).unwrap().config;
    assert_eq!(cfg.name.as_str(), "my-shop");
}

#[test]
fn name_falls_back_to_directory_basename() {
    let name = derive_name(None, std::path::Path::new("/home/me/Landing_Page")).unwrap();
    assert_eq!(name.as_str(), "landing-page");
    assert!(derive_name(Some("!!!"), std::path::Path::new("/tmp/x")).is_err());
}

// ── deploy_site ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn build_required_stops_before_any_remote_call() {
    let dir = project(&[
        ("package.json", r#"{"dependencies":{"next":"14.0.0"}}"#),
        ("next.config.mjs", "export default {}"),
    ]);
    let prepared = prepare(&LocalProjectInspector, request(dir.path())).unwrap();
    let shell = RecordingShell::new();
    let sync = RecordingSync::new();
    let scripts = RecordingScripts::all();

    let err = deploy_site(&ports(&shell, &sync, &scripts), &prepared, &RecordingReporter::default())
        .await
        .unwrap_err();

    let DeployError::BuildRequired(hint) = err.downcast_ref::<DeployError>().unwrap() else {
        panic!("expected BuildRequired, got {err}");
    };
    assert!(hint.contains("npm run build"));
    assert!(shell.calls().is_empty());
    assert!(sync.calls().is_empty());
}

#[tokio::test]
async fn successful_deploy_appends_host_reports() {
    let dir = project(&[("package.json", r#"{"scripts":{"start":"node index.js"}}"#)]);
    let prepared = prepare(&LocalProjectInspector, request(dir.path())).unwrap();
    let shell = RecordingShell::new()
        .on("pm2 -v", RemoteOutput::ok("5.3.0\n"))
        .on("crontab", RemoteOutput::ok("1\n"))
        .on("free -m", RemoteOutput::ok("2048 1024\n20480 10240\n"));
    let sync = RecordingSync::new();
    let scripts = RecordingScripts::all();
    let reporter = RecordingReporter::default();

    let result = deploy_site(&ports(&shell, &sync, &scripts), &prepared, &reporter)
        .await
        .unwrap();

    assert!(result.ok);
    assert!(result.lines.iter().any(|l| l == "--- BACKUPS ---"));
    assert!(result.lines.iter().any(|l| l == "--- SERVER HEALTH ---"));
    assert!(result.lines.iter().any(|l| l.contains("Backup schedule found (1 cron entry).")));
    let steps = reporter.steps.lock().unwrap();
    assert!(steps[0].starts_with("Deploying '"));
    assert!(steps[0].ends_with("to mikrus (process-managed)..."));
}

#[tokio::test]
async fn failed_deploy_skips_host_reports() {
    let dir = project(&[("index.html", "")]);
    let prepared = prepare(&LocalProjectInspector, request(dir.path())).unwrap();
    let shell = RecordingShell::new().on("===MOUNTS===", RemoteOutput::ok("===MOUNTS===\n===PROXY===\n"));
    let sync = RecordingSync::new();
    let scripts = RecordingScripts::all();

    let result = deploy_site(&ports(&shell, &sync, &scripts), &prepared, &RecordingReporter::default())
        .await
        .unwrap();

    assert!(!result.ok);
    assert!(!shell.ran("crontab"));
    assert!(!shell.ran("free -m"));
}

#[tokio::test]
async fn python_project_is_announced_as_container() {
    let dir = project(&[("requirements.txt", "fastapi\n")]);
    let mut req = request(dir.path());
    req.strategy = Some(Strategy::ProcessManaged);
    let prepared = prepare(&LocalProjectInspector, req).unwrap();
    let shell = RecordingShell::new();
    let sync = RecordingSync::new();
    let scripts = RecordingScripts::all();
    let reporter = RecordingReporter::default();

    deploy_site(&ports(&shell, &sync, &scripts), &prepared, &reporter)
        .await
        .unwrap();

    assert!(reporter.steps.lock().unwrap()[0].contains("(container)"));
}
