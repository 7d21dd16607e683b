//! Systemd unit probing and control.
//!
//! All unit interaction goes through the [`ServiceControl`] trait so the
//! suspension guard and its callers can be exercised against a fake in
//! tests; [`SystemdControl`] is the real implementation over `systemctl`.

pub mod guard;

pub use guard::{SuspendedService, with_suspended};

use crate::exec;

/// Minimal unit control surface used by the guard and the probes.
pub trait ServiceControl {
    /// Whether the unit is currently active.
    fn is_active(&self, unit: &str) -> bool;
    /// Whether the unit is enabled to start at boot.
    fn is_enabled(&self, unit: &str) -> bool;
    /// Start the unit.
    fn start(&self, unit: &str) -> Result<(), String>;
    /// Stop the unit.
    fn stop(&self, unit: &str) -> Result<(), String>;
}

/// `systemctl`-backed implementation of [`ServiceControl`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemdControl;

impl ServiceControl for SystemdControl {
    fn is_active(&self, unit: &str) -> bool {
        // is-active exits non-zero for every state except active; spawn
        // failures count as inactive.
        exec::run_tolerant(
            "systemctl",
            &["is-active", "--quiet", unit],
            &[],
            &format!("systemctl is-active {unit}"),
        )
        .is_ok_and(|cap| cap.success())
    }

    fn is_enabled(&self, unit: &str) -> bool {
        exec::run_tolerant(
            "systemctl",
            &["is-enabled", "--quiet", unit],
            &[],
            &format!("systemctl is-enabled {unit}"),
        )
        .is_ok_and(|cap| cap.success())
    }

    fn start(&self, unit: &str) -> Result<(), String> {
        exec::run_checked("systemctl", &["start", unit], &format!("systemctl start {unit}"))
            .map(|_| ())
    }

    fn stop(&self, unit: &str) -> Result<(), String> {
        exec::run_checked("systemctl", &["stop", unit], &format!("systemctl stop {unit}"))
            .map(|_| ())
    }
}

/// What: Printable state of a unit for the dashboard.
///
/// Inputs:
/// - `unit`: Unit name.
///
/// Output:
/// - First line of `systemctl is-active` stdout (`active`, `inactive`,
///   `failed`, ...), or `unknown` when the probe itself fails.
#[must_use]
pub fn state_label(unit: &str) -> String {
    exec::run_tolerant(
        "systemctl",
        &["is-active", unit],
        &[],
        &format!("systemctl is-active {unit}"),
    )
    .map_or_else(
        |_| "unknown".to_string(),
        |cap| {
            let first = cap.stdout.lines().next().unwrap_or("").trim();
            if first.is_empty() {
                "unknown".to_string()
            } else {
                first.to_string()
            }
        },
    )
}
