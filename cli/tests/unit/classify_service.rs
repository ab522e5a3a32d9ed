//! Classifier against real directories through `LocalProjectInspector`.

#![allow(clippy::unwrap_used)]

use siteship_cli::application::services::classify::classify;
use siteship_cli::infra::project_fs::LocalProjectInspector;
use siteship_common::{ProjectType, Strategy};

use crate::helpers::project;

#[test]
fn index_html_is_a_static_site() {
    let dir = project(&[("index.html", "<h1>hi</h1>")]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::StaticHtml);
    assert_eq!(a.strategy, Strategy::Static);
    assert_eq!(a.port, None);
    assert_eq!(a.files, ["index.html"]);
}

#[test]
fn node_start_script_is_process_managed() {
    let dir = project(&[(
        "package.json",
        r#"{"name":"api","scripts":{"start":"node server.js"}}"#,
    )]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::GenericNode);
    assert_eq!(a.strategy, Strategy::ProcessManaged);
    assert_eq!(a.start_command.as_deref(), Some("node server.js"));
    assert_eq!(a.port, Some(3000));
}

#[test]
fn node_port_comes_from_env_example() {
    let dir = project(&[
        ("package.json", r#"{"scripts":{"start":"node index.js"}}"#),
        (".env.example", "HOST=0.0.0.0\nPORT = 4100\n"),
    ]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.port, Some(4100));
}

#[test]
fn compose_wins_over_package_and_dockerfile() {
    let dir = project(&[
        (
            "docker-compose.yml",
            "services:\n  web:\n    build: .\n    ports:\n      - \"8080:80\"\n",
        ),
        ("Dockerfile", "FROM nginx"),
        ("package.json", r#"{"scripts":{"start":"node a.js"}}"#),
    ]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::ComposeDefined);
    assert_eq!(a.strategy, Strategy::Container);
    assert_eq!(a.port, Some(8080));
    assert_eq!(a.files, ["docker-compose.yml", "Dockerfile"]);
}

#[test]
fn next_without_standalone_build_requires_build() {
    let dir = project(&[
        ("package.json", r#"{"dependencies":{"next":"14.0.0"}}"#),
        ("next.config.mjs", "export default {}"),
    ]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::NextJs);
    assert!(a.build_required);
    assert!(a.build_hint.unwrap().contains("npm run build"));
}

#[test]
fn next_with_standalone_build_is_ready() {
    let dir = project(&[
        ("package.json", r#"{"dependencies":{"next":"14.0.0"}}"#),
        (".next/standalone/server.js", "//"),
    ]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::NextJs);
    assert!(!a.build_required);
    assert_eq!(a.start_command.as_deref(), Some("node server.js"));
}

#[test]
fn package_without_start_falls_through_with_warning() {
    let dir = project(&[
        ("package.json", r#"{"name":"x"}"#),
        ("requirements.txt", "fastapi\n"),
    ]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::Python);
    assert_eq!(a.port, Some(8000));
    assert!(a.warnings.iter().any(|w| w.contains("no 'start' script")));
    assert!(a.warnings.iter().any(|w| w.contains("uvicorn")));
}

#[test]
fn unknown_directory_recommends_manual_strategy() {
    let dir = project(&[("notes.txt", "hello")]);
    let a = classify(&LocalProjectInspector, dir.path());
    assert_eq!(a.project_type, ProjectType::Unknown);
    assert_eq!(a.strategy, Strategy::Static);
    assert!(a.warnings.iter().any(|w| w.contains("Specify a strategy manually")));
}

#[test]
fn missing_path_is_data_not_error() {
    let dir = project(&[]);
    let a = classify(&LocalProjectInspector, &dir.path().join("gone"));
    assert_eq!(a.project_type, ProjectType::Unknown);
    assert_eq!(a.summary, "Invalid project path.");
}

#[test]
fn classification_is_deterministic() {
    let dir = project(&[
        ("a.html", ""),
        ("b.html", ""),
        ("c.html", ""),
        ("d.html", ""),
        ("node_modules/x/index.js", "x"),
    ]);
    let first = classify(&LocalProjectInspector, dir.path());
    let second = classify(&LocalProjectInspector, dir.path());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.files, ["a.html", "b.html", "c.html"]);
    assert_eq!(first.total_files, 4);
}
