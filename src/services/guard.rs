//! Scoped suspension of a systemd unit with guaranteed restoration.

use std::time::Duration;

use super::ServiceControl;

/// Drop guard that stops a unit and restores its prior state when dropped.
///
/// Construction snapshots the unit's activity, stops it if needed and waits
/// for the settle delay. Whatever happens inside the protected scope, drop
/// runs the restoration; a unit that was already inactive is left alone on
/// both ends. Restoration failures are logged and swallowed so cleanup can
/// never mask the scan outcome.
pub struct SuspendedService<'a, C: ServiceControl> {
    control: &'a C,
    unit: String,
    was_active: bool,
    settle: Duration,
}

impl<'a, C: ServiceControl> SuspendedService<'a, C> {
    /// What: Suspend `unit` for the lifetime of the returned guard.
    ///
    /// Inputs:
    /// - `control`: Unit control implementation.
    /// - `unit`: Unit name to suspend.
    /// - `settle`: Delay after a stop so in-flight work can wind down.
    ///
    /// Output:
    /// - Guard that restores the recorded state on drop.
    ///
    /// Details:
    /// - A failed stop is logged and the guard proceeds as if the unit were
    ///   inactive; the enclosed operation runs regardless.
    pub fn suspend(control: &'a C, unit: &str, settle: Duration) -> Self {
        let was_active = control.is_active(unit);
        if was_active {
            tracing::info!(unit, "suspending service for the duration of the run");
            if let Err(e) = control.stop(unit) {
                tracing::warn!(unit, error = %e, "failed to stop service; continuing anyway");
            } else if !settle.is_zero() {
                std::thread::sleep(settle);
            }
        } else {
            tracing::debug!(unit, "service already inactive; nothing to suspend");
        }
        Self {
            control,
            unit: unit.to_string(),
            was_active,
            settle,
        }
    }

    /// Whether the unit was active when the guard was taken.
    #[must_use]
    pub const fn was_active(&self) -> bool {
        self.was_active
    }
}

impl<C: ServiceControl> Drop for SuspendedService<'_, C> {
    fn drop(&mut self) {
        if !self.was_active {
            return;
        }
        match self.control.start(&self.unit) {
            Ok(()) => {
                tracing::info!(unit = %self.unit, "service restored");
                if !self.settle.is_zero() {
                    std::thread::sleep(self.settle);
                }
            }
            Err(e) => {
                tracing::warn!(unit = %self.unit, error = %e, "failed to restore service");
            }
        }
    }
}

/// What: Run `body` while `unit` is suspended, restoring it afterwards.
///
/// Inputs:
/// - `control`, `unit`, `settle`: As for [`SuspendedService::suspend`].
/// - `body`: Operation to run inside the suspension window.
///
/// Output:
/// - Whatever `body` returns; restoration happens on every exit path.
pub fn with_suspended<C: ServiceControl, R>(
    control: &C,
    unit: &str,
    settle: Duration,
    body: impl FnOnce() -> R,
) -> R {
    let _guard = SuspendedService::suspend(control, unit, settle);
    body()
}
