//! Post-deploy backup and resource reports.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use siteship_cli::application::ports::RemoteOutput;
use siteship_cli::application::services::server_report::collect;
use siteship_cli::domain::HostRef;

use crate::mocks::RecordingShell;

fn host() -> HostRef {
    HostRef::parse("mikrus").unwrap()
}

#[tokio::test]
async fn healthy_host_with_backups() {
    let shell = RecordingShell::new()
        .on("crontab", RemoteOutput::ok("2\n"))
        .on("free -m", RemoteOutput::ok("4096 3072\n51200 40960\n"));

    let lines = collect(&shell, &host(), Duration::from_secs(10)).await;

    assert_eq!(lines[0], "");
    assert_eq!(lines[1], "--- BACKUPS ---");
    assert_eq!(lines[2], "Backup schedule found (2 cron entries).");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "--- SERVER HEALTH ---");
    assert!(lines[5].starts_with("RAM:  3072MB / 4096MB free (25% used): OK"));
    assert!(lines[6].starts_with("Disk: 40.0GB / 50.0GB free (20% used): OK"));
    assert!(lines.iter().any(|l| l.contains("good shape")));
    assert!(!lines.iter().any(|l| l.starts_with("Suggested upgrade")));
}

#[tokio::test]
async fn tight_host_without_backups_gets_upgrade_hint() {
    let shell = RecordingShell::new()
        .on("crontab", RemoteOutput::ok("0\n"))
        .on("free -m", RemoteOutput::ok("1024 100\n10240 5120\n"));

    let lines = collect(&shell, &host(), Duration::from_secs(10)).await;

    assert!(lines[2].starts_with("WARNING: No backup schedule found"));
    assert!(lines.iter().any(|l| l.contains("CRITICAL")));
    assert!(lines.iter().any(|l| l == "Suggested upgrade: Mikrus 3.0 (2GB RAM)"));
    assert!(lines.iter().any(|l| l == "Plans: https://mikr.us/#plans"));
}

#[tokio::test]
async fn failed_probes_degrade_to_notices() {
    let shell = RecordingShell::new()
        .on("crontab", RemoteOutput::failed(124, "ssh timed out after 10s"))
        .on("free -m", RemoteOutput::ok("garbage\n"));

    let lines = collect(&shell, &host(), Duration::from_secs(10)).await;

    assert_eq!(
        lines,
        [
            "",
            "--- BACKUPS ---",
            "Could not check backup configuration.",
            "",
            "--- SERVER HEALTH ---",
            "Could not check server resources.",
        ]
    );
}

#[tokio::test]
async fn backup_probe_uses_the_given_deadline() {
    let shell = RecordingShell::new();
    collect(&shell, &host(), Duration::from_secs(7)).await;

    let backup = shell
        .calls()
        .into_iter()
        .find(|c| c.command.contains("crontab"))
        .unwrap();
    assert_eq!(backup.timeout, Duration::from_secs(7));
}
