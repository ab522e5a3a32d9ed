//! Typed accessors over free-form remote command output.
//!
//! Each probe's raw text is interpreted here and nowhere else. Missing or
//! unexpected output always parses to the negative answer.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static HTTPS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"https://\S+").expect("valid regex")
});

static TRAILING_PORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(\d+)\s*$").expect("valid regex")
});

/// Section marker printed before the container mount list.
pub const MOUNTS_MARKER: &str = "===MOUNTS===";

/// Section marker printed before the reverse-proxy configuration.
pub const PROXY_MARKER: &str = "===PROXY===";

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Ports from a listening-socket table, one socket per line.
///
/// Accepts both bare port numbers and full `addr:port` columns.
#[must_use]
pub fn listening_ports(stdout: &str) -> BTreeSet<u16> {
    stdout
        .lines()
        .filter_map(|line| TRAILING_PORT_RE.captures(line))
        .filter_map(|caps| caps[1].parse::<u16>().ok())
        .collect()
}

// ── URLs ──────────────────────────────────────────────────────────────────────

/// First `https://` URL in registrar output.
#[must_use]
pub fn first_https_url(stdout: &str) -> Option<String> {
    HTTPS_URL_RE.find(stdout).map(|m| m.as_str().to_string())
}

// ── Already-served probe ──────────────────────────────────────────────────────

/// Independent evidence that a web root is already being served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServedSignals {
    /// A running container mounts the web root.
    pub container_mount: bool,
    /// The reverse-proxy configuration references the web root.
    pub proxy_reference: bool,
}

impl ServedSignals {
    #[must_use]
    pub fn is_served(self) -> bool {
        self.container_mount || self.proxy_reference
    }
}

/// Interpret the sectioned output of the already-served probe.
///
/// A signal is positive only when `web_root` appears as a complete path
/// token (optionally with a trailing `/`). `/var/www/public/site-old` does not
/// count as a reference to `/var/www/public/site`.
#[must_use]
pub fn served_signals(stdout: &str, web_root: &str) -> ServedSignals {
    let mut signals = ServedSignals::default();
    let mut section = None;
    for line in stdout.lines() {
        match line.trim() {
            MOUNTS_MARKER => section = Some(MOUNTS_MARKER),
            PROXY_MARKER => section = Some(PROXY_MARKER),
            content => {
                if !references_path(content, web_root) {
                    continue;
                }
                match section {
                    Some(MOUNTS_MARKER) => signals.container_mount = true,
                    Some(PROXY_MARKER) => signals.proxy_reference = true,
                    _ => {}
                }
            }
        }
    }
    signals
}

fn references_path(line: &str, path: &str) -> bool {
    line.split(|c: char| c.is_whitespace() || matches!(c, ',' | '"' | '\'' | ';' | '{' | '}'))
        .map(|token| token.split(':').next().unwrap_or(token))
        .any(|token| token == path || token.strip_suffix('/') == Some(path))
}

// ── Misc probes ───────────────────────────────────────────────────────────────

/// HTTP status code from a `curl -w '%{http_code}'` probe.
///
/// `000`, `UNREACHABLE` and empty output mean nothing answered.
#[must_use]
pub fn http_status(stdout: &str) -> Option<u16> {
    stdout
        .trim()
        .lines()
        .last()
        .and_then(|s| s.trim().parse::<u16>().ok())
        .filter(|code| *code != 0)
}

/// Last non-empty line, used for tool version banners.
#[must_use]
pub fn last_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).rfind(|l| !l.is_empty())
}

/// Whether a listing probe printed anything at all.
#[must_use]
pub fn has_output(stdout: &str) -> bool {
    !stdout.trim().is_empty()
}

/// Leading integer of a `grep -c` style count.
#[must_use]
pub fn count(stdout: &str) -> Option<u64> {
    stdout.lines().next().and_then(|l| l.trim().parse().ok())
}
