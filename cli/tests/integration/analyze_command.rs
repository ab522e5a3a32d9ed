//! `siteship analyze` end to end on temp directories.

#![allow(clippy::unwrap_used)]

use predicates::prelude::*;

use crate::{project, siteship};

fn analyze_json(files: &[(&str, &str)]) -> serde_json::Value {
    let home = tempfile::tempdir().unwrap();
    let dir = project(files);
    let out = siteship(home.path())
        .args(["analyze", "--json", "--name", "demo"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn static_site_json_report() {
    let v = analyze_json(&[("index.html", "<h1>hi</h1>"), ("style.css", "body{}")]);
    assert_eq!(v["name"], "demo");
    assert_eq!(v["type"], "static-html");
    assert_eq!(v["strategy"], "static");
    assert_eq!(v["totalFiles"], 2);
    assert_eq!(v["buildRequired"], false);
    assert!(v["port"].is_null());
}

#[test]
fn node_json_report_carries_start_command() {
    let v = analyze_json(&[("package.json", r#"{"scripts":{"start":"node app.js"}}"#)]);
    assert_eq!(v["type"], "generic-node");
    assert_eq!(v["strategy"], "process-managed");
    assert_eq!(v["startCommand"], "node app.js");
    assert_eq!(v["port"], 3000);
}

#[test]
fn compose_project_json_report() {
    let v = analyze_json(&[(
        "compose.yaml",
        "services:\n  app:\n    ports:\n      - \"9000:9000\"\n",
    )]);
    assert_eq!(v["type"], "compose-defined");
    assert_eq!(v["strategy"], "container");
    assert_eq!(v["port"], 9000);
}

#[test]
fn human_report_names_project_and_hint() {
    let home = tempfile::tempdir().unwrap();
    let dir = project(&[("requirements.txt", "flask\n")]);
    siteship(home.path())
        .args(["analyze", "--name", "My App"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("my-app"))
        .stdout(predicate::str::contains("python"))
        .stdout(predicate::str::contains("siteship deploy"));
}

#[test]
fn missing_directory_fails() {
    let home = tempfile::tempdir().unwrap();
    siteship(home.path())
        .args(["analyze", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn missing_directory_json_error() {
    let home = tempfile::tempdir().unwrap();
    siteship(home.path())
        .args(["analyze", "--json", "/definitely/not/here"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "INVALID_INPUT""#));
}
