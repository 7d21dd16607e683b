//! Command-line scan functionality.

use clamward::lock::RunLock;
use clamward::paths;
use clamward::services::SystemdControl;
use clamward::settings;
use clamward::status::{ScanMode, StatusStore, Verdict};

/// What: Run the full scan pipeline and exit with the verdict.
///
/// Inputs:
/// - `mode`: Scan depth selected on the command line.
/// - `apply_updates`: When false, pending updates are counted but not installed.
///
/// Output:
/// - Exits `0` for a clean verdict, `1` when the scan found infections.
///
/// Details:
/// - Refuses to start while another scan holds the run lock; a stale lock
///   left by a dead process is reclaimed automatically.
/// - Warns (but continues) when not running as root, since most scan
///   targets are unreadable without it.
/// - Probe or tool failures degrade the run rather than abort it, so a
///   status record is persisted either way.
pub fn handle_scan(mode: ScanMode, apply_updates: bool) -> ! {
    tracing::info!(mode = mode.as_str(), apply_updates, "Scan requested from CLI");

    let _lock = match RunLock::acquire(paths::lock_file()) {
        Ok(lock) => lock,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    #[cfg(unix)]
    if !nix::unistd::Uid::effective().is_root() {
        println!("Warning: not running as root; system areas will be unreadable to the scanner.");
        tracing::warn!("Scan started without root privileges");
    }

    let settings = settings::load_settings(&paths::settings_file());
    let store = StatusStore::at_default_location();
    let control = SystemdControl;

    let outcome = clamward::scan::run(mode, apply_updates, &store, &settings, &control);

    match outcome.record.scan_status {
        Verdict::Clean => std::process::exit(0),
        Verdict::Attention => std::process::exit(1),
    }
}
