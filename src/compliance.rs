//! Compliance scoring over the persisted record and scheduling state.

use crate::services::ServiceControl;
use crate::status::StatusRecord;

/// Systemd timer that runs scheduled scans when installed.
pub const SCHEDULE_TIMER: &str = "clamward.timer";

/// Outcome of a compliance evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compliance {
    /// 0, 50 or 100; worst applicable rule wins.
    pub score: u8,
    /// Human-readable findings, worst first. Empty at score 100.
    pub issues: Vec<String>,
}

/// What: Score the host from the last record and scheduling state.
///
/// Inputs:
/// - `record`: Last persisted status record (defaults if none exists).
/// - `automation_configured`: Whether scheduled scans are set up.
///
/// Output:
/// - Score with the findings that produced it.
///
/// Details:
/// - Rules by priority: missing automation scores 0 regardless of scan
///   results; otherwise any infected files score 50; otherwise 100.
/// - All applicable findings are listed even when a higher-priority rule
///   already fixed the score, so the dashboard shows the full picture.
#[must_use]
pub fn evaluate(record: &StatusRecord, automation_configured: bool) -> Compliance {
    let mut issues = Vec::new();
    if !automation_configured {
        issues.push(
            "automated scanning is not scheduled (no enabled timer or cron entry)".to_string(),
        );
    }
    if record.infected_files > 0 {
        issues.push(format!(
            "{} infected file{} detected by the last scan",
            record.infected_files,
            if record.infected_files == 1 { "" } else { "s" }
        ));
    }

    let score = if !automation_configured {
        0
    } else if record.infected_files > 0 {
        50
    } else {
        100
    };
    Compliance { score, issues }
}

/// What: Probe whether scheduled scans are configured on this host.
///
/// Inputs:
/// - `control`: Unit control used to check the schedule timer.
///
/// Output:
/// - `true` when the cron drop-in exists or the timer is enabled.
pub fn automation_configured(control: &impl ServiceControl) -> bool {
    if std::path::Path::new(crate::paths::CRON_MARKER).exists() {
        tracing::debug!(path = crate::paths::CRON_MARKER, "scan automation found via cron");
        return true;
    }
    control.is_enabled(SCHEDULE_TIMER)
}
