//! Command-line status dashboard functionality.

use clamward::dashboard;
use clamward::paths;
use clamward::services::SystemdControl;
use clamward::settings;
use clamward::status::StatusStore;

/// What: Render the status dashboard and exit.
///
/// Inputs:
/// - None.
///
/// Output:
/// - Exits `0`; a host with no scan data yet is reported, not an error.
///
/// Details:
/// - Reads the persisted record (if any), probes systemd and the
///   signature database live, and prints the sections to stdout.
pub fn handle_status() -> ! {
    tracing::info!("Status dashboard requested from CLI");

    let settings = settings::load_settings(&paths::settings_file());
    let store = StatusStore::at_default_location();
    let control = SystemdControl;

    dashboard::show(&store, &settings, &control);

    std::process::exit(0);
}
