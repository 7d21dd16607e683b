//! Extraction of the scan counters from captured engine output.

use crate::util::sanitize_count;

/// Counters pulled from a scan's summary block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Value of the last `Infected files:` line.
    pub infected: u64,
    /// Value of the last `Scanned files:` line.
    pub scanned: u64,
}

/// What: Pull infected/scanned counts out of raw clamscan output.
///
/// Inputs:
/// - `output`: Captured stdout, possibly empty or truncated.
///
/// Output:
/// - Sanitized counters; a missing label or mangled value yields 0 for that
///   counter.
///
/// Details:
/// - When a label appears more than once (nested summaries, partial reruns),
///   the **last** occurrence wins; the final summary block is the
///   authoritative one.
/// - The label's padding is trimmed here, then the value runs through
///   [`sanitize_count`], which rejects anything but pure digits; junk after
///   the label cannot poison the record.
#[must_use]
pub fn extract_summary(output: &str) -> ScanSummary {
    let mut infected: Option<&str> = None;
    let mut scanned: Option<&str> = None;
    for line in output.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Infected files:") {
            infected = Some(rest.trim());
        } else if let Some(rest) = trimmed.strip_prefix("Scanned files:") {
            scanned = Some(rest.trim());
        }
    }
    ScanSummary {
        infected: infected.map_or(0, sanitize_count),
        scanned: scanned.map_or(0, sanitize_count),
    }
}
