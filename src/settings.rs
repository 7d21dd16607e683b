//! Optional `settings.conf` overrides for unit names, engine binaries and
//! timing. Missing file or unknown keys leave the defaults untouched.

use std::path::Path;

/// Tunable knobs read from `~/.config/clamward/settings.conf`.
///
/// Only names and timing are configurable; scan target paths and the exclude
/// list are fixed so persisted results stay comparable between hosts.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Systemd unit of the on-access scanner daemon.
    pub clamd_service: String,
    /// Systemd unit of the signature updater that is suspended during scans.
    pub freshclam_service: String,
    /// Binary invoked for malware scans.
    pub clamscan_bin: String,
    /// Binary invoked to refresh signature definitions.
    pub freshclam_bin: String,
    /// Seconds allowed for the whole clamscan pass before it is killed.
    pub scan_timeout_secs: u64,
    /// Seconds allowed for each package-manager operation.
    pub package_timeout_secs: u64,
    /// Seconds allowed for the definitions refresh.
    pub freshclam_timeout_secs: u64,
    /// Seconds to wait after stopping/starting a unit before proceeding.
    pub settle_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clamd_service: "clamav-daemon".to_string(),
            freshclam_service: "clamav-freshclam".to_string(),
            clamscan_bin: "clamscan".to_string(),
            freshclam_bin: "freshclam".to_string(),
            scan_timeout_secs: 3600,
            package_timeout_secs: 900,
            freshclam_timeout_secs: 600,
            settle_secs: 2,
        }
    }
}

/// Strip everything from the first ` #` onward and trim the remainder.
fn strip_inline_comment(val: &str) -> &str {
    val.find(" #").map_or_else(|| val.trim(), |pos| val[..pos].trim())
}

/// What: Parse settings.conf content into a `Settings`, in place.
///
/// Inputs:
/// - `content`: File content as a string.
/// - `settings`: Mutable reference to `Settings` to populate.
///
/// Output:
/// - None (modifies `settings` in-place).
///
/// Details:
/// - Lines starting with `#` or `//` and blank lines are skipped.
/// - Keys are normalized to lowercase with `.`/`-`/space mapped to `_`.
/// - Unparseable numeric values leave the default in place.
/// - Unknown keys are ignored so newer configs keep working on older builds.
pub fn parse_settings(content: &str, settings: &mut Settings) {
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        if !trimmed.contains('=') {
            continue;
        }
        let mut parts = trimmed.splitn(2, '=');
        let raw_key = parts.next().unwrap_or("");
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val_raw = parts.next().unwrap_or("").trim();
        let val = strip_inline_comment(val_raw);
        match key.as_str() {
            "clamd_service" | "scanner_service" => {
                if !val.is_empty() {
                    settings.clamd_service = val.to_string();
                }
            }
            "freshclam_service" | "updater_service" => {
                if !val.is_empty() {
                    settings.freshclam_service = val.to_string();
                }
            }
            "clamscan_bin" | "clamscan" => {
                if !val.is_empty() {
                    settings.clamscan_bin = val.to_string();
                }
            }
            "freshclam_bin" | "freshclam" => {
                if !val.is_empty() {
                    settings.freshclam_bin = val.to_string();
                }
            }
            "scan_timeout_secs" | "scan_timeout" => {
                if let Ok(v) = val.parse::<u64>() {
                    settings.scan_timeout_secs = v;
                }
            }
            "package_timeout_secs" | "package_timeout" => {
                if let Ok(v) = val.parse::<u64>() {
                    settings.package_timeout_secs = v;
                }
            }
            "freshclam_timeout_secs" | "freshclam_timeout" => {
                if let Ok(v) = val.parse::<u64>() {
                    settings.freshclam_timeout_secs = v;
                }
            }
            "settle_secs" | "settle_delay" => {
                if let Ok(v) = val.parse::<u64>() {
                    settings.settle_secs = v;
                }
            }
            _ => {
                tracing::debug!(key = %key, "ignoring unknown settings key");
            }
        }
    }
}

/// What: Load settings from the given path, falling back to defaults.
///
/// Inputs:
/// - `path`: Location of settings.conf (usually [`crate::paths::settings_file`]).
///
/// Output:
/// - Fully populated `Settings`; defaults when the file is absent or unreadable.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();
    match std::fs::read_to_string(path) {
        Ok(content) => parse_settings(&content, &mut settings),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read settings; using defaults");
        }
    }
    settings
}
