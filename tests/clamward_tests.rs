use clamward as crate_root; // alias for clarity in imports

use crate_root::compliance;
use crate_root::scan::extract_summary;
use crate_root::status::{ScanMode, StatusRecord, Verdict};
use crate_root::updates::{OsFamily, family_from_os_release};
use crate_root::util;

fn record(infected: u64, scanned: u64) -> StatusRecord {
    StatusRecord {
        last_scan: "2026-08-20 04:12:33".to_string(),
        scan_status: Verdict::from_infected(infected),
        infected_files: infected,
        scanned_files: scanned,
        updates_available: 0,
    }
}

#[test]
fn util_sanitize_count() {
    assert_eq!(util::sanitize_count("7654"), 7654);
    assert_eq!(util::sanitize_count("007"), 7);
    assert_eq!(util::sanitize_count(" 12 \n"), 0);
    assert_eq!(util::sanitize_count("12a"), 0);
    assert_eq!(util::sanitize_count("-3"), 0);
    assert_eq!(util::sanitize_count(""), 0);
}

#[test]
fn util_age_in_days_buckets() {
    assert_eq!(util::age_in_days(0), "today");
    assert_eq!(util::age_in_days(86_399), "today");
    assert_eq!(util::age_in_days(86_400), "1 day ago");
    assert_eq!(util::age_in_days(86_400 * 9), "9 days ago");
}

#[test]
fn status_record_json_shape() {
    let v = serde_json::to_value(record(0, 7654)).expect("serialize record");
    let obj = v.as_object().expect("object");
    for key in [
        "last_scan",
        "scan_status",
        "infected_files",
        "scanned_files",
        "updates_available",
    ] {
        assert!(obj.contains_key(key), "missing key {key}");
    }
    assert_eq!(obj.len(), 5);
    assert_eq!(v["scan_status"], "clean");

    let v = serde_json::to_value(record(3, 100)).expect("serialize record");
    assert_eq!(v["scan_status"], "attention");
}

#[test]
fn status_record_partial_json_fills_defaults() {
    let rec: StatusRecord =
        serde_json::from_str(r#"{"infected_files": 2}"#).expect("partial record");
    assert_eq!(rec.infected_files, 2);
    assert_eq!(rec.last_scan, "never");
    assert_eq!(rec.scan_status, Verdict::Clean);
    assert!(!rec.has_scan_data());
}

#[test]
fn verdict_follows_infected_count() {
    assert_eq!(Verdict::from_infected(0), Verdict::Clean);
    assert_eq!(Verdict::from_infected(1), Verdict::Attention);
    assert_eq!(Verdict::from_infected(9999), Verdict::Attention);
}

#[test]
fn scan_mode_parses_cli_words() {
    assert_eq!(ScanMode::from_config_key("quick"), Some(ScanMode::Quick));
    assert_eq!(ScanMode::from_config_key(" Full "), Some(ScanMode::Full));
    assert_eq!(ScanMode::from_config_key("deep"), None);
}

#[test]
fn summary_reads_clamscan_output() {
    let output = "\
----------- SCAN SUMMARY -----------
Known viruses: 8704194
Scanned directories: 120
Scanned files: 7654
Infected files: 0
Data scanned: 4.20 GB
Time: 812.502 sec (13 m 32 s)
";
    let summary = extract_summary(output);
    assert_eq!(summary.infected, 0);
    assert_eq!(summary.scanned, 7654);

    let summary = extract_summary("no summary block here");
    assert_eq!(summary.infected, 0);
    assert_eq!(summary.scanned, 0);
}

#[test]
fn compliance_score_laws() {
    // No automation dominates everything else.
    let c = compliance::evaluate(&record(0, 10), false);
    assert_eq!(c.score, 0);
    assert!(!c.issues.is_empty());

    // Automation but infections: half marks.
    let c = compliance::evaluate(&record(2, 10), true);
    assert_eq!(c.score, 50);
    assert_eq!(c.issues.len(), 1);

    // Automation and clean: full marks.
    let c = compliance::evaluate(&record(0, 10), true);
    assert_eq!(c.score, 100);
    assert!(c.issues.is_empty());
}

#[test]
fn family_classification_from_os_release() {
    assert_eq!(
        family_from_os_release("ID=ubuntu\nID_LIKE=debian\n"),
        OsFamily::DebianLike
    );
    assert_eq!(
        family_from_os_release("ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n"),
        OsFamily::RpmLike
    );
    assert_eq!(family_from_os_release("ID=arch\n"), OsFamily::Unsupported);
    assert_eq!(family_from_os_release(""), OsFamily::Unsupported);
}
