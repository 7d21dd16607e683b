//! Core value types for the persisted host status.

/// Scan verdict recorded after a completed run.
///
/// `Attention` means at least one infected file was reported; everything
/// else, including degraded runs that produced no data, stays `Clean`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No infections reported by the last scan.
    Clean,
    /// The last scan reported one or more infected files.
    Attention,
}

impl Verdict {
    /// Stable textual form used in the record and the dashboard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Attention => "attention",
        }
    }

    /// Derive the verdict from an infected-file count.
    #[must_use]
    pub const fn from_infected(count: u64) -> Self {
        if count > 0 { Self::Attention } else { Self::Clean }
    }
}

/// Breadth of a malware scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanMode {
    /// User-facing areas with per-file ceilings; minutes, not hours.
    Quick,
    /// Quick targets plus system areas, no ceilings.
    Full,
}

impl ScanMode {
    /// Parse a mode name from the command line; unknown values map to `None`.
    #[must_use]
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "quick" => Some(Self::Quick),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Stable textual form for logs and the dashboard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quick => "quick",
            Self::Full => "full",
        }
    }
}

/// Snapshot of the last completed run, persisted as a single JSON document.
///
/// Every field has a safe default so a missing or truncated store never
/// blocks a run; unknown fields from newer builds are ignored on load.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatusRecord {
    /// Local timestamp of the last scan, or `"never"`.
    pub last_scan: String,
    /// Verdict of the last scan.
    pub scan_status: Verdict,
    /// Infected files reported by the last scan.
    pub infected_files: u64,
    /// Files examined by the last scan.
    pub scanned_files: u64,
    /// Upgradable packages observed during the last run.
    pub updates_available: u64,
}

impl Default for StatusRecord {
    fn default() -> Self {
        Self {
            last_scan: "never".to_string(),
            scan_status: Verdict::Clean,
            infected_files: 0,
            scanned_files: 0,
            updates_available: 0,
        }
    }
}

impl StatusRecord {
    /// Whether this record stems from an actual completed scan.
    #[must_use]
    pub fn has_scan_data(&self) -> bool {
        self.last_scan != "never"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_round_trips_through_json() {
        let clean = serde_json::to_string(&Verdict::Clean).expect("serialize");
        assert_eq!(clean, "\"clean\"");
        let parsed: Verdict = serde_json::from_str("\"attention\"").expect("deserialize");
        assert_eq!(parsed, Verdict::Attention);
    }

    #[test]
    fn verdict_follows_infected_count() {
        assert_eq!(Verdict::from_infected(0), Verdict::Clean);
        assert_eq!(Verdict::from_infected(3), Verdict::Attention);
    }

    #[test]
    fn scan_mode_parses_known_keys() {
        assert_eq!(ScanMode::from_config_key("quick"), Some(ScanMode::Quick));
        assert_eq!(ScanMode::from_config_key(" FULL "), Some(ScanMode::Full));
        assert_eq!(ScanMode::from_config_key("deep"), None);
    }

    #[test]
    /// What: Defaults describe a host that has never been scanned.
    ///
    /// Inputs:
    /// - `StatusRecord::default()`.
    ///
    /// Output:
    /// - `"never"` timestamp, clean verdict, zeroed counters.
    fn default_record_is_never_scanned() {
        let rec = StatusRecord::default();
        assert_eq!(rec.last_scan, "never");
        assert_eq!(rec.scan_status, Verdict::Clean);
        assert_eq!(rec.infected_files, 0);
        assert_eq!(rec.scanned_files, 0);
        assert_eq!(rec.updates_available, 0);
        assert!(!rec.has_scan_data());
    }

    #[test]
    fn partial_json_fills_missing_fields_with_defaults() {
        let rec: StatusRecord =
            serde_json::from_str("{\"infected_files\": 2}").expect("deserialize");
        assert_eq!(rec.infected_files, 2);
        assert_eq!(rec.last_scan, "never");
        assert_eq!(rec.scan_status, Verdict::Clean);
    }
}
