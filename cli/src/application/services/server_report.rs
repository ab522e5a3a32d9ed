//! Application service: post-deploy host reports.
//!
//! Both reports are best-effort and independent of the deployment outcome,
//! so they run concurrently and degrade to an explanatory line on failure.

use std::time::Duration;

use crate::application::ports::RemoteShell;
use crate::domain::HostRef;
use crate::domain::health::{ResourceSnapshot, backup_lines, health_unavailable};
use crate::domain::remote_output::count;

/// Deadline for the resource probe.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(15);

const RESOURCE_PROBE: &str =
    "free -m | awk '/^Mem:/ {print $2, $7}'; df -m / | awk 'NR==2 {print $2, $4}'";

const BACKUP_PROBE: &str = "(crontab -l 2>/dev/null; cat /etc/cron.d/* 2>/dev/null) \
     | grep -ciE 'backup|restic|borg|rclone|duplicity' || true";

/// Memory and disk usage summary.
pub async fn resource_health(shell: &impl RemoteShell, host: &HostRef) -> Vec<String> {
    let out = shell.exec(host, RESOURCE_PROBE, HEALTH_TIMEOUT).await;
    if !out.success() {
        tracing::debug!(host = %host, code = out.exit_code, "resource probe failed");
        return health_unavailable();
    }
    ResourceSnapshot::parse(&out.stdout).map_or_else(health_unavailable, |s| s.summary_lines())
}

/// Whether any backup job is scheduled on the host.
pub async fn backup_status(shell: &impl RemoteShell, host: &HostRef, timeout: Duration) -> Vec<String> {
    let out = shell.exec(host, BACKUP_PROBE, timeout).await;
    let schedules = if out.success() { count(&out.stdout) } else { None };
    backup_lines(schedules)
}

/// Both reports, each preceded by a blank line.
pub async fn collect(shell: &impl RemoteShell, host: &HostRef, probe_timeout: Duration) -> Vec<String> {
    let (backup, health) = tokio::join!(
        backup_status(shell, host, probe_timeout),
        resource_health(shell, host)
    );
    let mut lines = Vec::with_capacity(backup.len() + health.len() + 2);
    lines.push(String::new());
    lines.extend(backup);
    lines.push(String::new());
    lines.extend(health);
    lines
}
