//! Project classification as an ordered rule table.
//!
//! The filesystem is read once by the infra layer into a [`ProjectSnapshot`];
//! everything here is a pure function of that snapshot, so classifying the
//! same tree twice yields identical analyses.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use siteship_common::{ProjectAnalysis, ProjectType, Strategy};

use crate::domain::deploy::{DEFAULT_CONTAINER_PORT, DEFAULT_NODE_PORT, DEFAULT_PYTHON_PORT};
use crate::domain::templates::COMPOSE_FILES;

/// Directories skipped when counting files and size.
pub const NOISE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".next",
    "dist",
    ".venv",
    "venv",
    "__pycache__",
];

pub const PACKAGE_MANIFEST: &str = "package.json";
pub const ENV_EXAMPLE: &str = ".env.example";
pub const DOCKERFILE: &str = "Dockerfile";
pub const STANDALONE_BUILD: &str = ".next/standalone";
const FRAMEWORK_CONFIGS: &[&str] = &["next.config.js", "next.config.mjs", "next.config.ts"];
const PYTHON_DESCRIPTORS: &[&str] = &["requirements.txt", "pyproject.toml"];
const MAX_LISTED_HTML: usize = 3;

/// Top-level files whose contents the rules need.
pub const CONTENT_FILES: &[&str] = &[
    "docker-compose.yaml",
    "docker-compose.yml",
    "compose.yaml",
    "compose.yml",
    PACKAGE_MANIFEST,
    ENV_EXAMPLE,
];

/// Nested paths whose existence the rules need.
pub const PROBED_PATHS: &[&str] = &[STANDALONE_BUILD];

static COMPOSE_PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r#"ports:\s*\n\s*-\s*"?(\d+):\d+"?"#).expect("valid regex")
});

static ENV_PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"PORT\s*=\s*(\d+)").expect("valid regex")
});

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// Everything the classifier may know about a local directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSnapshot {
    /// `false` when the path is missing or not a directory.
    pub readable: bool,
    pub path_display: String,
    /// Names of the entries directly inside the project root.
    pub top_level: BTreeSet<String>,
    /// Contents of the [`CONTENT_FILES`] that exist and are valid UTF-8.
    pub contents: BTreeMap<String, String>,
    /// Which of the [`PROBED_PATHS`] exist.
    pub nested: BTreeSet<String>,
    pub total_files: u64,
    pub total_size_kb: u64,
}

impl ProjectSnapshot {
    /// Snapshot of a path that could not be read as a directory.
    #[must_use]
    pub fn unreadable(path_display: impl Into<String>) -> Self {
        Self {
            readable: false,
            path_display: path_display.into(),
            ..Self::default()
        }
    }

    fn has(&self, name: &str) -> bool {
        self.top_level.contains(name)
    }

    fn content(&self, name: &str) -> Option<&str> {
        self.contents.get(name).map(String::as_str)
    }

    /// `package.json` parsed as a JSON object. Anything else counts as absent.
    fn package_manifest(&self) -> Option<serde_json::Value> {
        self.content(PACKAGE_MANIFEST)
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
            .filter(serde_json::Value::is_object)
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// Marker files and caveats collected while walking the rule table.
#[derive(Debug, Default)]
pub struct Findings {
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

/// The part of an analysis a matching rule decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub project_type: ProjectType,
    pub strategy: Strategy,
    pub port: Option<u16>,
    pub start_command: Option<String>,
    pub build_hint: Option<String>,
    pub summary: String,
}

impl Verdict {
    fn new(project_type: ProjectType, strategy: Strategy, summary: String) -> Self {
        Self {
            project_type,
            strategy,
            port: None,
            start_command: None,
            build_hint: None,
            summary,
        }
    }
}

/// One classification rule. Rules may record findings without matching.
pub struct ClassifierRule {
    pub name: &'static str,
    pub apply: fn(&ProjectSnapshot, &mut Findings) -> Option<Verdict>,
}

/// Priority order: the first rule returning a verdict wins.
pub const RULES: &[ClassifierRule] = &[
    ClassifierRule { name: "compose-manifest", apply: compose_rule },
    ClassifierRule { name: "container-build-file", apply: dockerfile_rule },
    ClassifierRule { name: "package-manifest", apply: package_rule },
    ClassifierRule { name: "python-descriptor", apply: python_rule },
    ClassifierRule { name: "html", apply: html_rule },
];

fn compose_rule(snap: &ProjectSnapshot, found: &mut Findings) -> Option<Verdict> {
    let manifest = COMPOSE_FILES.iter().find(|f| snap.has(f))?;
    found.files.push((*manifest).to_string());
    let port = snap.content(manifest).and_then(compose_host_port);
    if snap.has(DOCKERFILE) {
        found.files.push(DOCKERFILE.to_string());
    }
    let port_note = port.map(|p| format!(" Port: {p}.")).unwrap_or_default();
    let mut verdict = Verdict::new(
        ProjectType::ComposeDefined,
        Strategy::Container,
        format!("Compose project ({manifest}). Will be deployed with 'docker compose up -d'.{port_note}"),
    );
    verdict.port = port;
    Some(verdict)
}

fn dockerfile_rule(snap: &ProjectSnapshot, found: &mut Findings) -> Option<Verdict> {
    if !snap.has(DOCKERFILE) {
        return None;
    }
    found.files.push(DOCKERFILE.to_string());
    let mut verdict = Verdict::new(
        ProjectType::DockerfileOnly,
        Strategy::Container,
        "Dockerfile found. A compose manifest will be generated and the image built on the host."
            .to_string(),
    );
    verdict.port = Some(DEFAULT_CONTAINER_PORT);
    Some(verdict)
}

fn package_rule(snap: &ProjectSnapshot, found: &mut Findings) -> Option<Verdict> {
    let manifest = snap.package_manifest()?;
    found.files.push(PACKAGE_MANIFEST.to_string());

    let framework_config = FRAMEWORK_CONFIGS.iter().any(|f| snap.has(f));
    let framework_dep = manifest
        .get("dependencies")
        .and_then(|deps| deps.get("next"))
        .is_some_and(is_truthy);
    if framework_config || framework_dep {
        let standalone = snap.nested.contains(STANDALONE_BUILD);
        let mut verdict = Verdict::new(
            ProjectType::NextJs,
            Strategy::Container,
            if standalone {
                "Next.js app with standalone build. Ready to deploy as a container.".to_string()
            } else {
                "Next.js app detected but needs building first.".to_string()
            },
        );
        verdict.port = Some(DEFAULT_NODE_PORT);
        verdict.start_command = Some("node server.js".to_string());
        if !standalone {
            verdict.build_hint = Some(
                "Run 'npm run build' first. Ensure next.config.js has output: 'standalone'."
                    .to_string(),
            );
        }
        return Some(verdict);
    }

    let start = manifest
        .get("scripts")
        .and_then(|s| s.get("start"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty());
    if let Some(start) = start {
        let port = snap
            .content(ENV_EXAMPLE)
            .and_then(env_example_port)
            .unwrap_or(DEFAULT_NODE_PORT);
        let mut verdict = Verdict::new(
            ProjectType::GenericNode,
            Strategy::ProcessManaged,
            format!("Node.js app (start: '{start}'). Will run under PM2 on port {port}."),
        );
        verdict.port = Some(port);
        verdict.start_command = Some(start.to_string());
        return Some(verdict);
    }

    found.warnings.push(
        "package.json found but no 'start' script. Add scripts.start or pass --start-command."
            .to_string(),
    );
    None
}

fn python_rule(snap: &ProjectSnapshot, found: &mut Findings) -> Option<Verdict> {
    let descriptor = PYTHON_DESCRIPTORS.iter().find(|f| snap.has(f))?;
    found.files.push((*descriptor).to_string());
    found.warnings.push(
        "Python project detected. The generated container runs 'uvicorn main:app' unless you provide a Dockerfile."
            .to_string(),
    );
    let mut verdict = Verdict::new(
        ProjectType::Python,
        Strategy::Container,
        format!("Python project ({descriptor}). A Dockerfile will be generated and deployed as a container."),
    );
    verdict.port = Some(DEFAULT_PYTHON_PORT);
    Some(verdict)
}

fn html_rule(snap: &ProjectSnapshot, found: &mut Findings) -> Option<Verdict> {
    if snap.has("index.html") {
        found.files.push("index.html".to_string());
        return Some(Verdict::new(
            ProjectType::StaticHtml,
            Strategy::Static,
            format!(
                "Static site ({} files, {}KB). Served directly by the web server.",
                snap.total_files, snap.total_size_kb
            ),
        ));
    }
    let html: Vec<&String> = snap
        .top_level
        .iter()
        .filter(|name| name.ends_with(".html"))
        .collect();
    if html.is_empty() {
        return None;
    }
    found
        .files
        .extend(html.iter().take(MAX_LISTED_HTML).map(|s| (*s).clone()));
    Some(Verdict::new(
        ProjectType::StaticHtml,
        Strategy::Static,
        format!(
            "Static site with {} HTML file(s) ({}KB). Served directly by the web server.",
            html.len(),
            snap.total_size_kb
        ),
    ))
}

// ── Classification ────────────────────────────────────────────────────────────

/// JavaScript truthiness of a manifest value.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Classify a snapshot. Never fails: unreadable paths become `unknown`.
#[must_use]
pub fn classify_snapshot(snap: &ProjectSnapshot) -> ProjectAnalysis {
    if !snap.readable {
        return ProjectAnalysis {
            project_type: ProjectType::Unknown,
            strategy: Strategy::Static,
            files: Vec::new(),
            total_files: 0,
            total_size_kb: 0,
            port: None,
            start_command: None,
            build_required: false,
            build_hint: None,
            warnings: vec![format!(
                "Path does not exist or is not a directory: {}",
                snap.path_display
            )],
            summary: "Invalid project path.".to_string(),
        };
    }

    let mut found = Findings::default();
    let verdict = RULES
        .iter()
        .find_map(|rule| (rule.apply)(snap, &mut found))
        .unwrap_or_else(|| {
            found
                .warnings
                .push("Could not detect project type. Specify a strategy manually.".to_string());
            Verdict::new(
                ProjectType::Unknown,
                Strategy::Static,
                "Unknown project type. Pass --strategy explicitly.".to_string(),
            )
        });

    ProjectAnalysis {
        project_type: verdict.project_type,
        strategy: verdict.strategy,
        files: found.files,
        total_files: snap.total_files,
        total_size_kb: snap.total_size_kb,
        port: verdict.port,
        start_command: verdict.start_command,
        build_required: verdict.build_hint.is_some(),
        build_hint: verdict.build_hint,
        warnings: found.warnings,
        summary: verdict.summary,
    }
}

/// First host port of the first `ports:` list item in a compose manifest.
#[must_use]
pub fn compose_host_port(manifest: &str) -> Option<u16> {
    COMPOSE_PORT_RE
        .captures(manifest)
        .and_then(|c| c[1].parse().ok())
}

/// `PORT=` assignment in an example environment file.
#[must_use]
pub fn env_example_port(content: &str) -> Option<u16> {
    ENV_PORT_RE.captures(content).and_then(|c| c[1].parse().ok())
}
