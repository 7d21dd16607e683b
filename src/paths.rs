//! Filesystem locations used across the crate: the per-user config tree,
//! the persisted status record, the run lock, and well-known system paths.

use std::env;
use std::path::{Path, PathBuf};

/// Directory holding the ClamAV signature databases on mainstream distros.
pub const SIGNATURE_DB_DIR: &str = "/var/lib/clamav";

/// Cron drop-in consulted when deciding whether scans are automated.
pub const CRON_MARKER: &str = "/etc/cron.d/clamward";

/// Resolve an XDG base directory from environment or default to `$HOME` + segments.
///
/// Inputs:
/// - `var`: Environment variable to check (e.g., `XDG_CONFIG_HOME`).
/// - `home_default`: Fallback path segments relative to `$HOME` if `var` is unset/empty.
///
/// Output: Resolved base directory path.
fn xdg_base_dir(var: &str, home_default: &[&str]) -> PathBuf {
    if let Ok(p) = env::var(var)
        && !p.trim().is_empty()
    {
        return PathBuf::from(p);
    }
    let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    let mut base = PathBuf::from(home);
    for seg in home_default {
        base = base.join(seg);
    }
    base
}

/// Return `$HOME/.config/clamward`, ensuring it exists.
///
/// Inputs: none
///
/// Output: `Some(PathBuf)` when HOME is set and directory can be created; `None` otherwise.
fn home_config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let dir = Path::new(&home).join(".config").join("clamward");
        if std::fs::create_dir_all(&dir).is_ok() {
            return Some(dir);
        }
    }
    None
}

/// Config directory for clamward (ensured to exist).
pub fn config_dir() -> PathBuf {
    // Prefer HOME ~/.config/clamward first
    if let Some(dir) = home_config_dir() {
        return dir;
    }
    // Fallback: use XDG_CONFIG_HOME (or default to ~/.config) and ensure
    let base = xdg_base_dir("XDG_CONFIG_HOME", &[".config"]);
    let dir = base.join("clamward");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Logs directory under config: "$HOME/.config/clamward/logs" (ensured to exist)
pub fn logs_dir() -> PathBuf {
    let base = config_dir();
    let dir = base.join("logs");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Path of the persisted status record.
pub fn status_file() -> PathBuf {
    config_dir().join("status.json")
}

/// Path of the exclusive run lock taken for the duration of a scan.
pub fn lock_file() -> PathBuf {
    config_dir().join("scan.lock")
}

/// Path of the optional settings file.
pub fn settings_file() -> PathBuf {
    config_dir().join("settings.conf")
}

/// What: Home directory of the invoking user, as scanning root.
///
/// Output:
/// - `$HOME` when set and non-empty; `/root` otherwise (the scan runs
///   as root in automated setups where HOME may be absent).
pub fn home_dir() -> PathBuf {
    match env::var("HOME") {
        Ok(h) if !h.trim().is_empty() => PathBuf::from(h),
        _ => PathBuf::from("/root"),
    }
}
