//! Textual status dashboard: live probes plus the last persisted record.
//!
//! Section construction is pure over [`LiveState`] so rendering can be
//! tested without systemd or a signature database; the probing lives in
//! [`gather_live`].

use std::path::Path;

use crate::compliance;
use crate::services::{self, ServiceControl};
use crate::settings::Settings;
use crate::status::StatusRecord;
use crate::updates::{self, OsFamily};

/// Days without a signature refresh before the database counts as stale.
const STALE_AFTER_DAYS: u64 = 7;

/// One titled block of dashboard output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Header printed above the lines.
    pub title: String,
    /// Body lines, already formatted.
    pub lines: Vec<String>,
}

/// State of the on-disk signature database.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureDb {
    /// Number of `.cvd`/`.cld` files found.
    pub files: usize,
    /// Seconds since the newest database file changed, when any exist.
    pub newest_age_secs: Option<u64>,
}

/// Live snapshot of one systemd timer relevant to the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerState {
    /// Timer unit name.
    pub unit: String,
    /// State label of the timer.
    pub state: String,
    /// Whether the timer is enabled at boot.
    pub enabled: bool,
}

/// Everything the dashboard probes live at render time.
#[derive(Clone, Debug)]
pub struct LiveState {
    /// State label of the scanner daemon unit.
    pub clamd_state: String,
    /// Whether the scanner daemon is enabled at boot.
    pub clamd_enabled: bool,
    /// Unit name of the scanner daemon (for display).
    pub clamd_unit: String,
    /// State label of the signature updater unit.
    pub freshclam_state: String,
    /// Whether the signature updater is enabled at boot.
    pub freshclam_enabled: bool,
    /// Unit name of the signature updater (for display).
    pub freshclam_unit: String,
    /// The detected family's unattended OS-update timers.
    pub auto_update_timers: Vec<TimerState>,
    /// Signature database files on disk.
    pub signature_db: SignatureDb,
    /// Live upgradable count; `None` when the host family is unsupported.
    pub pending_updates: Option<u64>,
    /// Detected OS family.
    pub family: OsFamily,
    /// Whether scheduled scans are configured.
    pub automation: bool,
}

/// What: Inspect the signature database directory.
///
/// Inputs:
/// - `dir`: Database directory (normally `/var/lib/clamav`).
///
/// Output:
/// - File count and the age of the newest `.cvd`/`.cld` file.
#[must_use]
pub fn signature_db_status(dir: &Path) -> SignatureDb {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return SignatureDb::default();
    };
    let mut files = 0usize;
    let mut newest: Option<std::time::SystemTime> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_db = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("cvd") || e.eq_ignore_ascii_case("cld"));
        if !is_db {
            continue;
        }
        files += 1;
        if let Ok(meta) = entry.metadata()
            && let Ok(modified) = meta.modified()
        {
            newest = Some(match newest {
                Some(prev) if prev >= modified => prev,
                _ => modified,
            });
        }
    }
    let newest_age_secs = newest.map(|t| {
        std::time::SystemTime::now()
            .duration_since(t)
            .map_or(0, |d| d.as_secs())
    });
    SignatureDb {
        files,
        newest_age_secs,
    }
}

/// What: Probe the live state every dashboard render re-reads.
///
/// Inputs:
/// - `settings`: Unit names and timeouts.
/// - `control`: Unit control for activity/enablement probes.
///
/// Output:
/// - Fresh `LiveState`; only the last-scan outcome comes from the record.
pub fn gather_live(settings: &Settings, control: &impl ServiceControl) -> LiveState {
    let family = updates::detect_family();
    let pending_updates = match family {
        OsFamily::Unsupported => None,
        supported => Some(updates::count_upgradable(supported, settings)),
    };
    let auto_update_timers = family
        .auto_update_timers()
        .iter()
        .map(|unit| TimerState {
            unit: (*unit).to_string(),
            state: services::state_label(unit),
            enabled: control.is_enabled(unit),
        })
        .collect();
    LiveState {
        clamd_state: services::state_label(&settings.clamd_service),
        clamd_enabled: control.is_enabled(&settings.clamd_service),
        clamd_unit: settings.clamd_service.clone(),
        freshclam_state: services::state_label(&settings.freshclam_service),
        freshclam_enabled: control.is_enabled(&settings.freshclam_service),
        freshclam_unit: settings.freshclam_service.clone(),
        auto_update_timers,
        signature_db: signature_db_status(Path::new(crate::paths::SIGNATURE_DB_DIR)),
        pending_updates,
        family,
        automation: compliance::automation_configured(control),
    }
}

fn service_line(unit: &str, state: &str, enabled: bool) -> String {
    format!(
        "{unit}: {state} ({})",
        if enabled { "enabled" } else { "disabled" }
    )
}

/// What: Build the dashboard sections from a record and live state.
///
/// Inputs:
/// - `record`: Last persisted record, if one exists.
/// - `live`: Freshly probed host state.
///
/// Output:
/// - Without a record: the single no-data section. With one: six sections
///   in fixed order (scan status, compliance, pending updates, service
///   states, signature database, quick reference).
#[must_use]
pub fn build_sections(record: Option<&StatusRecord>, live: &LiveState) -> Vec<Section> {
    let Some(record) = record else {
        return vec![Section {
            title: "Scan Status".to_string(),
            lines: vec![
                "No scan data yet.".to_string(),
                "Run `clamward scan` to produce the first status record.".to_string(),
            ],
        }];
    };

    let mut sections = Vec::with_capacity(6);

    sections.push(Section {
        title: "Scan Status".to_string(),
        lines: vec![
            format!("Last scan:      {}", record.last_scan),
            format!("Verdict:        {}", record.scan_status.as_str()),
            format!("Infected files: {}", record.infected_files),
            format!("Scanned files:  {}", record.scanned_files),
        ],
    });

    let compliance = compliance::evaluate(record, live.automation);
    let mut compliance_lines = vec![format!("Score: {}/100", compliance.score)];
    if compliance.issues.is_empty() {
        compliance_lines.push("No outstanding issues.".to_string());
    } else {
        for issue in &compliance.issues {
            compliance_lines.push(format!("Issue: {issue}"));
        }
    }
    sections.push(Section {
        title: "Compliance".to_string(),
        lines: compliance_lines,
    });

    let updates_line = live.pending_updates.map_or_else(
        || {
            format!(
                "Pending updates: {} (from last scan; live probe unsupported here)",
                record.updates_available
            )
        },
        |n| format!("Pending updates: {n}"),
    );
    sections.push(Section {
        title: "Pending Updates".to_string(),
        lines: vec![
            updates_line,
            format!("Package manager: {}", live.family.as_str()),
        ],
    });

    let mut service_lines = vec![
        service_line(&live.clamd_unit, &live.clamd_state, live.clamd_enabled),
        service_line(
            &live.freshclam_unit,
            &live.freshclam_state,
            live.freshclam_enabled,
        ),
    ];
    for timer in &live.auto_update_timers {
        service_lines.push(service_line(&timer.unit, &timer.state, timer.enabled));
    }
    sections.push(Section {
        title: "Service States".to_string(),
        lines: service_lines,
    });

    let mut sig_lines = Vec::new();
    if live.signature_db.files == 0 {
        sig_lines.push(format!(
            "No signature database in {}",
            crate::paths::SIGNATURE_DB_DIR
        ));
        sig_lines.push(format!(
            "Tip: run `freshclam` or start the updater ({})",
            live.freshclam_unit
        ));
    } else {
        sig_lines.push(format!(
            "{} database file{} in {}",
            live.signature_db.files,
            if live.signature_db.files == 1 { "" } else { "s" },
            crate::paths::SIGNATURE_DB_DIR
        ));
        if let Some(age) = live.signature_db.newest_age_secs {
            sig_lines.push(format!("Last updated {}", crate::util::age_in_days(age)));
            if age > STALE_AFTER_DAYS * 86_400 {
                sig_lines.push(format!(
                    "Warning: signatures older than {STALE_AFTER_DAYS} days; check {}",
                    live.freshclam_unit
                ));
            }
        }
    }
    sections.push(Section {
        title: "Signature Database".to_string(),
        lines: sig_lines,
    });

    sections.push(Section {
        title: "Quick Reference".to_string(),
        lines: vec![
            "clamward scan          quick scan, apply pending updates".to_string(),
            "clamward scan full     deep scan including system areas".to_string(),
            "clamward scan --no-upgrade   count updates without installing".to_string(),
            format!("Logs: {}", crate::paths::logs_dir().display()),
        ],
    });

    sections
}

/// Render sections to a single printable string.
#[must_use]
pub fn render(sections: &[Section]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("=== {} ===\n", section.title));
        for line in &section.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// What: Gather, build and print the dashboard for the current host.
///
/// Inputs:
/// - `store`: Status store to read the last record from.
/// - `settings`: Unit names and timeouts.
/// - `control`: Unit control for live probes.
pub fn show(store: &crate::status::StatusStore, settings: &Settings, control: &impl ServiceControl) {
    let record = store.try_load();
    let live = gather_live(settings, control);
    let sections = build_sections(record.as_ref(), &live);
    print!("{}", render(&sections));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Verdict;

    fn fake_live() -> LiveState {
        LiveState {
            clamd_state: "active".to_string(),
            clamd_enabled: true,
            clamd_unit: "clamav-daemon".to_string(),
            freshclam_state: "inactive".to_string(),
            freshclam_enabled: false,
            freshclam_unit: "clamav-freshclam".to_string(),
            auto_update_timers: Vec::new(),
            signature_db: SignatureDb {
                files: 3,
                newest_age_secs: Some(3600),
            },
            pending_updates: Some(4),
            family: OsFamily::DebianLike,
            automation: true,
        }
    }

    fn scanned_record() -> StatusRecord {
        StatusRecord {
            last_scan: "2026-08-20 04:12:33".to_string(),
            scan_status: Verdict::Clean,
            infected_files: 0,
            scanned_files: 7654,
            updates_available: 12,
        }
    }

    #[test]
    /// What: Without a record only the no-data section renders.
    ///
    /// Inputs:
    /// - `None` record with normal live state.
    ///
    /// Output:
    /// - Exactly one section pointing the user at `clamward scan`.
    fn no_record_renders_single_section() {
        let sections = build_sections(None, &fake_live());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Scan Status");
        assert!(sections[0].lines[0].contains("No scan data yet"));
    }

    #[test]
    /// What: With a record the six sections appear in fixed order.
    ///
    /// Inputs:
    /// - A clean record and healthy live state.
    ///
    /// Output:
    /// - Titles in the documented order.
    fn sections_follow_fixed_order() {
        let record = scanned_record();
        let sections = build_sections(Some(&record), &fake_live());
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Scan Status",
                "Compliance",
                "Pending Updates",
                "Service States",
                "Signature Database",
                "Quick Reference"
            ]
        );
    }

    #[test]
    /// What: The updates section prefers the live count over the record.
    ///
    /// Inputs:
    /// - Record claiming 12 pending updates, live probe reporting 4; then
    ///   the unsupported-family fallback.
    ///
    /// Output:
    /// - Live value printed when present; record value with a note when not.
    fn updates_section_prefers_live_count() {
        let record = scanned_record();
        let live = fake_live();
        let sections = build_sections(Some(&record), &live);
        assert!(sections[2].lines[0].contains('4'));

        let mut no_live = fake_live();
        no_live.pending_updates = None;
        no_live.family = OsFamily::Unsupported;
        let sections = build_sections(Some(&record), &no_live);
        assert!(sections[2].lines[0].contains("12"));
        assert!(sections[2].lines[0].contains("from last scan"));
    }

    #[test]
    /// What: Auto-update timers render after the two ClamAV units.
    ///
    /// Inputs:
    /// - Live state carrying both Debian apt timers as active and enabled.
    ///
    /// Output:
    /// - Service States holds four lines, the timers in probe order.
    fn service_section_lists_auto_update_timers() {
        let record = scanned_record();
        let mut live = fake_live();
        live.auto_update_timers = vec![
            TimerState {
                unit: "apt-daily.timer".to_string(),
                state: "active".to_string(),
                enabled: true,
            },
            TimerState {
                unit: "apt-daily-upgrade.timer".to_string(),
                state: "active".to_string(),
                enabled: true,
            },
        ];
        let sections = build_sections(Some(&record), &live);
        let services = &sections[3];
        assert_eq!(services.lines.len(), 4);
        assert!(services.lines[2].contains("apt-daily.timer"));
        assert!(services.lines[3].contains("apt-daily-upgrade.timer"));
    }

    #[test]
    fn stale_signatures_get_a_warning() {
        let record = scanned_record();
        let mut live = fake_live();
        live.signature_db.newest_age_secs = Some(86_400 * 10);
        let sections = build_sections(Some(&record), &live);
        let sig = &sections[4];
        assert!(sig.lines.iter().any(|l| l.contains("Warning")));
    }

    #[test]
    fn missing_signature_db_suggests_freshclam() {
        let record = scanned_record();
        let mut live = fake_live();
        live.signature_db = SignatureDb::default();
        let sections = build_sections(Some(&record), &live);
        let sig = &sections[4];
        assert!(sig.lines[0].contains("No signature database"));
        assert!(sig.lines[1].contains("freshclam"));
    }

    #[test]
    fn compliance_issues_render_per_line() {
        let mut record = scanned_record();
        record.infected_files = 2;
        record.scan_status = Verdict::Attention;
        let mut live = fake_live();
        live.automation = false;
        let sections = build_sections(Some(&record), &live);
        let compliance = &sections[1];
        assert_eq!(compliance.lines[0], "Score: 0/100");
        assert_eq!(
            compliance.lines.iter().filter(|l| l.starts_with("Issue:")).count(),
            2
        );
    }

    #[test]
    fn render_prints_headers_and_lines() {
        let sections = vec![Section {
            title: "Scan Status".to_string(),
            lines: vec!["Last scan: never".to_string()],
        }];
        let out = render(&sections);
        assert!(out.starts_with("=== Scan Status ===\n"));
        assert!(out.contains("Last scan: never"));
    }

    #[test]
    fn signature_db_status_counts_only_db_files() {
        let dir = std::env::temp_dir().join(format!(
            "clamward_sigdb_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("System time is before UNIX epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("create test dir");
        std::fs::write(dir.join("main.cvd"), b"x").expect("write cvd");
        std::fs::write(dir.join("daily.cld"), b"x").expect("write cld");
        std::fs::write(dir.join("mirrors.dat"), b"x").expect("write dat");
        let db = signature_db_status(&dir);
        assert_eq!(db.files, 2);
        assert!(db.newest_age_secs.is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn signature_db_status_missing_dir_is_empty() {
        let db = signature_db_status(Path::new("/nonexistent/clamward/sigdb"));
        assert_eq!(db, SignatureDb::default());
    }
}
