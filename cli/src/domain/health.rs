//! Post-deploy host health: resource usage levels and backup presence.

use std::fmt;

/// Section header for the resource report.
pub const HEALTH_HEADER: &str = "--- SERVER HEALTH ---";

/// Section header for the backup report.
pub const BACKUP_HEADER: &str = "--- BACKUPS ---";

const PLANS_URL: &str = "https://mikr.us/#plans";

/// Upgrade suggestions keyed by the host's current total RAM.
const UPGRADE_TIERS: &[(u64, &str)] = &[
    (1024, "Mikrus 3.0 (2GB RAM)"),
    (2048, "Mikrus 3.5 (4GB RAM)"),
    (4096, "Mikrus 4.1 (8GB RAM)"),
    (8192, "Mikrus 4.2 (16GB RAM)"),
];

/// Usage level, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Ok,
    Warning,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        })
    }
}

/// Memory and root-disk figures in MB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSnapshot {
    pub ram_total_mb: u64,
    pub ram_avail_mb: u64,
    pub disk_total_mb: u64,
    pub disk_avail_mb: u64,
}

impl ResourceSnapshot {
    /// Parse two lines of `<total> <available>`: memory first, then disk.
    ///
    /// Returns `None` for missing lines, non-numeric fields, or zero totals.
    #[must_use]
    pub fn parse(stdout: &str) -> Option<Self> {
        let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());
        let (ram_total_mb, ram_avail_mb) = pair(lines.next()?)?;
        let (disk_total_mb, disk_avail_mb) = pair(lines.next()?)?;
        if ram_total_mb == 0 || disk_total_mb == 0 {
            return None;
        }
        Some(Self {
            ram_total_mb,
            ram_avail_mb,
            disk_total_mb,
            disk_avail_mb,
        })
    }

    #[must_use]
    pub fn ram_used_pct(&self) -> u64 {
        used_pct(self.ram_total_mb, self.ram_avail_mb)
    }

    #[must_use]
    pub fn disk_used_pct(&self) -> u64 {
        used_pct(self.disk_total_mb, self.disk_avail_mb)
    }

    #[must_use]
    pub fn ram_level(&self) -> Level {
        level(self.ram_used_pct(), 80, 60)
    }

    #[must_use]
    pub fn disk_level(&self) -> Level {
        level(self.disk_used_pct(), 85, 60)
    }

    #[must_use]
    pub fn worst_level(&self) -> Level {
        self.ram_level().max(self.disk_level())
    }

    /// Human-readable report, header included.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut out = vec![
            HEALTH_HEADER.to_string(),
            format!(
                "RAM:  {}MB / {}MB free ({}% used): {}",
                self.ram_avail_mb,
                self.ram_total_mb,
                self.ram_used_pct(),
                self.ram_level()
            ),
            format!(
                "Disk: {} / {} free ({}% used): {}",
                gigabytes(self.disk_avail_mb),
                gigabytes(self.disk_total_mb),
                self.disk_used_pct(),
                self.disk_level()
            ),
        ];
        let status = match self.worst_level() {
            Level::Ok => "Status: Server in good shape. You can safely add more services.",
            Level::Warning => {
                "Status: Resources getting tight. Consider upgrading before adding heavy services."
            }
            Level::Critical => {
                "Status: Server under heavy load! Consider upgrading or removing unused services."
            }
        };
        out.push(status.to_string());
        if self.worst_level() > Level::Ok {
            if let Some(tier) = upgrade_suggestion(self.ram_total_mb) {
                out.push(format!("Suggested upgrade: {tier}"));
                out.push(format!("Plans: {PLANS_URL}"));
            }
        }
        out
    }
}

/// Report used when the resource probe failed or printed garbage.
#[must_use]
pub fn health_unavailable() -> Vec<String> {
    vec![
        HEALTH_HEADER.to_string(),
        "Could not check server resources.".to_string(),
    ]
}

/// Report for the backup probe: `Some(n)` is the number of matching cron entries.
#[must_use]
pub fn backup_lines(schedules: Option<u64>) -> Vec<String> {
    let detail = match schedules {
        None => "Could not check backup configuration.".to_string(),
        Some(0) => "WARNING: No backup schedule found in crontab or /etc/cron.d. \
                    Set up backups before storing important data."
            .to_string(),
        Some(n) => format!("Backup schedule found ({n} cron entr{}).", if n == 1 { "y" } else { "ies" }),
    };
    vec![BACKUP_HEADER.to_string(), detail]
}

/// Smallest tier above the current RAM size, `None` at the top tier.
#[must_use]
pub fn upgrade_suggestion(ram_total_mb: u64) -> Option<&'static str> {
    UPGRADE_TIERS
        .iter()
        .find(|(max, _)| ram_total_mb <= *max)
        .map(|(_, name)| *name)
}

fn pair(line: &str) -> Option<(u64, u64)> {
    let mut fields = line.split_whitespace().map(str::parse::<u64>);
    let total = fields.next()?.ok()?;
    let avail = fields.next()?.ok()?;
    Some((total, avail))
}

fn used_pct(total: u64, avail: u64) -> u64 {
    let used = total.saturating_sub(avail);
    (used * 100 + total / 2) / total
}

fn level(pct: u64, critical_above: u64, warning_above: u64) -> Level {
    if pct > critical_above {
        Level::Critical
    } else if pct > warning_above {
        Level::Warning
    } else {
        Level::Ok
    }
}

#[allow(clippy::cast_precision_loss)]
fn gigabytes(mb: u64) -> String {
    format!("{:.1}GB", mb as f64 / 1024.0)
}
