//! Host-state probes.
//!
//! Short remote commands whose output is interpreted by
//! [`crate::domain::remote_output`]. A failed or empty probe is a negative
//! answer, never an error.

use std::time::Duration;

use crate::application::ports::RemoteShell;
use crate::domain::HostRef;
use crate::domain::deploy::{PROXY_CONFIG_PATH, first_free_port};
use crate::domain::remote_output::{
    self, MOUNTS_MARKER, PROXY_MARKER, ServedSignals, has_output, http_status, last_line,
    listening_ports,
};
use crate::domain::templates::{COMPOSE_FILES, shell_quote};

/// Deadline for the settle-then-curl reachability probe.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(15);

/// Seconds a freshly started stack gets before the reachability probe.
pub const SETTLE_SECS: u64 = 3;

/// Whether a container mount or the proxy configuration already serves `web_root`.
pub async fn served_signals(
    shell: &impl RemoteShell,
    host: &HostRef,
    web_root: &str,
    timeout: Duration,
) -> ServedSignals {
    let command = format!(
        "echo '{MOUNTS_MARKER}'; sudo docker ps --no-trunc --format '{{{{.Mounts}}}}' 2>/dev/null; \
         echo '{PROXY_MARKER}'; cat {PROXY_CONFIG_PATH} 2>/dev/null; true"
    );
    let out = shell.exec(host, &command, timeout).await;
    if !out.success() {
        tracing::debug!(host = %host, code = out.exit_code, "served probe failed, treating as not served");
        return ServedSignals::default();
    }
    remote_output::served_signals(&out.stdout, web_root)
}

/// First port at or above `base` with no listening socket on the host.
pub async fn free_port(shell: &impl RemoteShell, host: &HostRef, base: u16, timeout: Duration) -> u16 {
    let out = shell
        .exec(
            host,
            "ss -tlnp 2>/dev/null | awk '{print $4}' | grep -oE '[0-9]+$' | sort -un",
            timeout,
        )
        .await;
    let used = if out.success() {
        listening_ports(&out.stdout)
    } else {
        Default::default()
    };
    first_free_port(base, &used)
}

/// PM2 version when the process manager is installed.
pub async fn process_manager_version(
    shell: &impl RemoteShell,
    host: &HostRef,
    timeout: Duration,
) -> Option<String> {
    let out = shell.exec(host, "command -v pm2 && pm2 -v", timeout).await;
    if out.success() {
        last_line(&out.stdout).map(str::to_string)
    } else {
        None
    }
}

/// Whether any compose manifest exists in `dir` on the host.
pub async fn compose_present(
    shell: &impl RemoteShell,
    host: &HostRef,
    dir: &str,
    timeout: Duration,
) -> bool {
    let candidates: Vec<String> = COMPOSE_FILES
        .iter()
        .map(|f| shell_quote(&format!("{dir}/{f}")))
        .collect();
    let command = format!("ls {} 2>/dev/null | head -1", candidates.join(" "));
    let out = shell.exec(host, &command, timeout).await;
    has_output(&out.stdout)
}

/// HTTP status served on `port` after a short settle delay.
pub async fn http_probe(shell: &impl RemoteShell, host: &HostRef, port: u16) -> Option<u16> {
    let command = format!(
        "sleep {SETTLE_SECS}; curl -s -o /dev/null -w '%{{http_code}}' http://localhost:{port}/ 2>/dev/null || echo UNREACHABLE"
    );
    let out = shell.exec(host, &command, HEALTH_PROBE_TIMEOUT).await;
    http_status(&out.stdout)
}
