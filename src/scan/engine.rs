//! clamscan invocation: target selection, fixed excludes and mode ceilings.

use std::path::PathBuf;

use crate::exec;
use crate::settings::Settings;
use crate::status::ScanMode;

/// Directory patterns excluded in every mode: virtual filesystems, VCS
/// metadata and dependency caches. clamscan treats these as regexes.
pub const EXCLUDED_DIR_PATTERNS: &[&str] = &[
    "^/proc",
    "^/sys",
    "^/dev",
    "^/run",
    "\\.git$",
    "node_modules",
    "\\.cache$",
];

/// Per-file and recursion ceilings applied to quick scans only. Full scans
/// run uncapped.
const QUICK_CEILINGS: &[&str] = &[
    "--max-filesize=100M",
    "--max-scansize=400M",
    "--max-recursion=16",
];

/// System areas added on top of the quick targets for a full scan.
const FULL_EXTRA_TARGETS: &[&str] = &["/home", "/etc", "/opt", "/srv", "/tmp", "/var", "/usr/local"];

/// What: Resolve the filesystem roots a scan of `mode` covers.
///
/// Inputs:
/// - `mode`: Scan breadth.
///
/// Output:
/// - Existing, deduplicated target paths in a stable order.
///
/// Details:
/// - Quick covers the invoking user's home and `/root`; full adds the
///   system areas. Paths absent on this host are dropped so clamscan does
///   not abort on them.
#[must_use]
pub fn target_paths(mode: ScanMode) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = Vec::new();
    let mut push = |p: PathBuf| {
        if p.exists() && !targets.contains(&p) {
            targets.push(p);
        }
    };

    push(crate::paths::home_dir());
    push(PathBuf::from("/root"));
    if mode == ScanMode::Full {
        for extra in FULL_EXTRA_TARGETS {
            push(PathBuf::from(extra));
        }
    }
    targets
}

/// What: Run clamscan over the mode's targets and capture its output.
///
/// Inputs:
/// - `mode`: Scan breadth; quick adds size/recursion ceilings.
/// - `settings`: Binary name and timeout.
///
/// Output:
/// - Captured stdout. clamscan exits 1 when it finds infections and 2 on
///   engine errors; both still return whatever output was produced. Spawn
///   failure or an empty target list degrade to an empty string.
pub fn scan(mode: ScanMode, settings: &Settings) -> String {
    let targets = target_paths(mode);
    if targets.is_empty() {
        tracing::warn!(mode = mode.as_str(), "no scan targets exist on this host");
        return String::new();
    }

    let mut args: Vec<String> = vec!["-r".to_string(), "-i".to_string()];
    for pattern in EXCLUDED_DIR_PATTERNS {
        args.push(format!("--exclude-dir={pattern}"));
    }
    if mode == ScanMode::Quick {
        args.extend(QUICK_CEILINGS.iter().map(|s| (*s).to_string()));
    }
    for target in &targets {
        args.push(target.display().to_string());
    }
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

    tracing::info!(
        mode = mode.as_str(),
        targets = targets.len(),
        timeout_secs = settings.scan_timeout_secs,
        "starting malware scan"
    );

    match exec::run_tolerant_with_timeout(
        &settings.clamscan_bin,
        &arg_refs,
        &[],
        "malware scan",
        settings.scan_timeout_secs,
    ) {
        Ok(cap) => {
            if cap.timed_out {
                tracing::warn!(
                    mode = mode.as_str(),
                    "malware scan hit its deadline; partial output only"
                );
            } else {
                match cap.exit_code {
                    // 0 = clean, 1 = infections found; both carry a summary
                    Some(0 | 1) => {
                        tracing::info!(mode = mode.as_str(), exit_code = ?cap.exit_code, "malware scan finished");
                    }
                    other => {
                        tracing::warn!(
                            mode = mode.as_str(),
                            exit_code = ?other,
                            stderr = %cap.stderr.trim(),
                            "malware scan reported engine errors"
                        );
                    }
                }
            }
            cap.stdout
        }
        Err(e) => {
            tracing::warn!(
                mode = mode.as_str(),
                error = %e,
                "malware scanner unavailable; treating as empty output"
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Full targets are a superset of quick targets.
    ///
    /// Inputs:
    /// - Both modes resolved on the current host.
    ///
    /// Output:
    /// - Every quick target appears in the full list; no duplicates in
    ///   either list.
    fn full_targets_contain_quick_targets() {
        let quick = target_paths(ScanMode::Quick);
        let full = target_paths(ScanMode::Full);
        for t in &quick {
            assert!(full.contains(t), "{} missing from full targets", t.display());
        }
        let mut seen = full.clone();
        seen.dedup();
        assert_eq!(seen.len(), full.len());
    }

    #[test]
    fn targets_exist_on_disk() {
        for t in target_paths(ScanMode::Full) {
            assert!(t.exists(), "{} does not exist", t.display());
        }
    }

    #[test]
    /// What: A missing scanner binary degrades to empty output.
    ///
    /// Inputs:
    /// - Settings pointing at a binary that cannot exist.
    ///
    /// Output:
    /// - Empty string, no panic.
    fn missing_scanner_degrades_to_empty_output() {
        let settings = Settings {
            clamscan_bin: "clamward-no-such-scanner".to_string(),
            scan_timeout_secs: 5,
            ..Settings::default()
        };
        assert_eq!(scan(ScanMode::Quick, &settings), String::new());
    }
}
