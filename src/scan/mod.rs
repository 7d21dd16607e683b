//! Scan orchestration: definitions update, package updates, malware scan,
//! result extraction and persistence, in that order.
//!
//! Every step degrades on failure; the run always reaches persistence so
//! the status record reflects the attempt, not just successful ones.

pub mod engine;
pub mod summary;

pub use summary::{ScanSummary, extract_summary};

use std::time::Duration;

use crate::exec;
use crate::services::{self, ServiceControl};
use crate::settings::Settings;
use crate::status::{ScanMode, StatusRecord, StatusStore, Verdict};
use crate::updates;

/// Result of a completed orchestration run.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Record produced by the run (persisted when `persisted` is true).
    pub record: StatusRecord,
    /// Whether the record made it to disk.
    pub persisted: bool,
}

/// What: Refresh signature definitions while the updater service is down.
///
/// Inputs:
/// - `settings`: Binary name and timeout.
///
/// Output:
/// - None; every failure mode is a warning. A rate-limited CDN response is
///   expected when the updater service already ran recently and is logged
///   as such, not as a failure.
fn definitions_update(settings: &Settings) {
    match exec::run_tolerant_with_timeout(
        &settings.freshclam_bin,
        &[],
        &[],
        "freshclam definitions update",
        settings.freshclam_timeout_secs,
    ) {
        Ok(cap) if cap.success() => {
            tracing::info!("virus definitions updated");
        }
        Ok(cap) => {
            let combined = format!("{}\n{}", cap.stdout, cap.stderr).to_ascii_lowercase();
            if combined.contains("cool-down") || combined.contains("429") {
                tracing::warn!(
                    "definitions update rate-limited; existing signatures remain in use"
                );
            } else {
                tracing::warn!(
                    exit_code = ?cap.exit_code,
                    timed_out = cap.timed_out,
                    "definitions update failed; scanning with existing signatures"
                );
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "freshclam unavailable; scanning with existing signatures");
        }
    }
}

/// What: Run the full scan pipeline and persist the outcome.
///
/// Inputs:
/// - `mode`: Scan breadth.
/// - `apply_updates`: Whether pending package upgrades are installed after
///   counting.
/// - `store`: Destination for the status record.
/// - `settings`: Unit names, binaries and timeouts.
/// - `control`: Service control used to suspend the signature updater.
///
/// Output:
/// - The produced record and whether it reached disk.
///
/// Details:
/// - Steps run in a fixed order: definitions update (inside the updater
///   suspension), package updates, malware scan, extraction, persistence.
/// - A failed step zeroes its contribution and the run continues; the only
///   step that can be skipped is the upgrade application.
/// - The persisted `last_scan` stamp is taken at run start, so it records
///   when scanning began rather than when persistence happened.
/// - Progress goes to stdout and to `logs/scan.log`, detail to the tracing
///   log.
pub fn run<C: ServiceControl>(
    mode: ScanMode,
    apply_updates: bool,
    store: &StatusStore,
    settings: &Settings,
    control: &C,
) -> RunOutcome {
    use std::fs::OpenOptions;
    use std::io::Write;

    let log_file_path = crate::paths::logs_dir().join("scan.log");
    let write_log = |message: &str| {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file_path)
        {
            let _ = writeln!(file, "[{}] {}", crate::util::now_stamp(), message);
        }
    };

    let started_at = crate::util::now_stamp();
    tracing::info!(
        mode = mode.as_str(),
        apply_updates,
        started_at = %started_at,
        "scan run starting"
    );
    write_log(&format!("Starting {} scan", mode.as_str()));

    // Step 1: definitions update with the updater service suspended so the
    // manual freshclam run cannot race it over the signature database.
    println!("Updating virus definitions...");
    services::with_suspended(
        control,
        &settings.freshclam_service,
        Duration::from_secs(settings.settle_secs),
        || definitions_update(settings),
    );
    write_log("Definitions update step finished");

    // Step 2: package updates.
    println!("Checking for package updates...");
    let family = updates::detect_family();
    let updates_available = updates::pending_updates(family, settings, apply_updates);
    write_log(&format!(
        "Package update step finished: {updates_available} pending ({})",
        family.as_str()
    ));

    // Step 3: malware scan.
    println!("Scanning for malware ({} mode)...", mode.as_str());
    let output = engine::scan(mode, settings);

    // Step 4: result extraction.
    let summary = extract_summary(&output);
    if output.is_empty() {
        write_log("Malware scan produced no output; counters degraded to 0");
    } else {
        write_log(&format!(
            "Malware scan finished: {} scanned, {} infected",
            summary.scanned, summary.infected
        ));
    }

    // Step 5: persist.
    let record = StatusRecord {
        last_scan: started_at,
        scan_status: Verdict::from_infected(summary.infected),
        infected_files: summary.infected,
        scanned_files: summary.scanned,
        updates_available,
    };
    let persisted = match store.save(&record) {
        Ok(()) => {
            write_log(&format!(
                "SUMMARY: verdict={} infected={} scanned={} updates={}",
                record.scan_status.as_str(),
                record.infected_files,
                record.scanned_files,
                record.updates_available
            ));
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist status record");
            write_log(&format!("FAILED: could not persist status record: {e}"));
            false
        }
    };

    println!();
    println!("Scan verdict:      {}", record.scan_status.as_str());
    println!("Infected files:    {}", record.infected_files);
    println!("Scanned files:     {}", record.scanned_files);
    println!("Updates available: {}", record.updates_available);
    if persisted {
        println!("Status saved to {}", store.path().display());
    } else {
        println!("Warning: status record could not be saved");
    }

    tracing::info!(
        verdict = record.scan_status.as_str(),
        infected = record.infected_files,
        scanned = record.scanned_files,
        updates = record.updates_available,
        persisted,
        "scan run finished"
    );

    RunOutcome { record, persisted }
}
