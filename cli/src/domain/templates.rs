//! Generated remote files and shell quoting.
//!
//! Everything here returns plain strings; the executor pipes them to the host.

use std::collections::BTreeMap;

use crate::domain::deploy::AppName;

/// Memory ceiling applied to every synthesized compose service.
pub const COMPOSE_MEMORY_LIMIT: &str = "256M";

/// Base image for synthesized Python build files.
pub const PYTHON_BASE_IMAGE: &str = "python:3.12-slim";

/// Compose manifest names, in lookup order.
pub const COMPOSE_FILES: &[&str] = &[
    "docker-compose.yaml",
    "docker-compose.yml",
    "compose.yaml",
    "compose.yml",
];

/// Quote `value` for a POSIX shell using single quotes.
///
/// Embedded single quotes become `'\''`.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Minimal compose manifest: one service built from the synced directory.
#[must_use]
pub fn compose_manifest(name: &AppName, port: u16) -> String {
    format!(
        "services:
  {name}:
    build: .
    restart: always
    ports:
      - \"{port}:{port}\"
    deploy:
      resources:
        limits:
          memory: {COMPOSE_MEMORY_LIMIT}
"
    )
}

/// Build file for a Python project without its own.
///
/// Installs from `requirements.txt`, falling back to `pip install .` for
/// `pyproject.toml` projects, and serves `main:app` with uvicorn.
#[must_use]
pub fn python_dockerfile(port: u16) -> String {
    format!(
        "FROM {PYTHON_BASE_IMAGE}
WORKDIR /app
COPY requirements.txt* pyproject.toml* ./
RUN pip install --no-cache-dir -r requirements.txt 2>/dev/null || pip install --no-cache-dir . 2>/dev/null || true
COPY . .
EXPOSE {port}
CMD [\"python\", \"-m\", \"uvicorn\", \"main:app\", \"--host\", \"0.0.0.0\", \"--port\", \"{port}\"]
"
    )
}

/// `KEY=VALUE` lines, sorted by key, newline-terminated.
#[must_use]
pub fn env_file(vars: &BTreeMap<String, String>) -> String {
    vars.iter().map(|(k, v)| format!("{k}={v}\n")).collect()
}
