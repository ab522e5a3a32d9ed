//! Integration tests for siteship CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. None of
//! them reach a remote host: every case stops at validation or analysis.

#![allow(clippy::expect_used)]

mod analyze_command;

use std::path::Path;

use assert_cmd::Command;

/// The binary with a private config location and no ambient overrides.
fn siteship(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("siteship"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home)
        .env("SITESHIP_CONFIG", home.join("config.yaml"))
        .env_remove("SITESHIP_HOST")
        .env_remove("SITESHIP_TOOLBOX_PATH")
        .env_remove("SITESHIP_YES")
        .env_remove("CI")
        .env_remove("RUST_LOG");
    cmd
}

/// Temp directory populated with `(relative path, contents)` pairs.
fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (rel, body) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(path, body).expect("write");
    }
    dir
}
