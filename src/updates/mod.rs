//! Package-update probing and application across OS families.
//!
//! Four primitives (refresh index, count upgradable, apply upgrades,
//! cleanup) branch once on [`OsFamily`]; unsupported hosts turn every
//! operation into a logged no-op so the surrounding run keeps going.

pub mod family;
pub mod parsing;

pub use family::{OsFamily, detect_family, family_from_os_release};

use crate::exec;
use crate::settings::Settings;

/// What: Refresh the package index for the host family.
///
/// Inputs:
/// - `family`: Detected OS family.
/// - `settings`: Timeout configuration.
///
/// Output:
/// - None; a stale index only means a stale count, so failures are logged
///   and swallowed.
pub fn refresh_index(family: OsFamily, settings: &Settings) {
    let (program, args): (&str, &[&str]) = match family {
        OsFamily::DebianLike => ("apt-get", &["update"]),
        OsFamily::RpmLike => ("dnf", &["-q", "makecache"]),
        OsFamily::Unsupported => {
            tracing::debug!("unsupported OS family; skipping index refresh");
            return;
        }
    };
    match exec::run_tolerant_with_timeout(
        program,
        args,
        &[],
        "package index refresh",
        settings.package_timeout_secs,
    ) {
        Ok(cap) if cap.success() => {
            tracing::info!(family = family.as_str(), "package index refreshed");
        }
        Ok(cap) => {
            tracing::warn!(
                family = family.as_str(),
                exit_code = ?cap.exit_code,
                timed_out = cap.timed_out,
                stderr = %cap.stderr.trim(),
                "package index refresh failed; continuing with stale index"
            );
        }
        Err(e) => {
            tracing::warn!(family = family.as_str(), error = %e, "package index refresh unavailable");
        }
    }
}

/// What: Count packages with pending upgrades.
///
/// Inputs:
/// - `family`: Detected OS family.
/// - `settings`: Timeout configuration.
///
/// Output:
/// - Number of upgradable packages; 0 on any failure or unsupported host.
///
/// Details:
/// - Debian-like hosts parse `apt list --upgradable`.
/// - RPM-like hosts parse `dnf -q check-update`, where exit 100 is the
///   updates-exist signal and exit 0 means none.
pub fn count_upgradable(family: OsFamily, settings: &Settings) -> u64 {
    match family {
        OsFamily::DebianLike => {
            match exec::run_tolerant_with_timeout(
                "apt",
                &["list", "--upgradable"],
                &[],
                "apt list --upgradable",
                settings.package_timeout_secs,
            ) {
                Ok(cap) if cap.success() => parsing::count_apt_upgradable(cap.stdout.as_bytes()),
                Ok(cap) => {
                    tracing::warn!(
                        exit_code = ?cap.exit_code,
                        timed_out = cap.timed_out,
                        "apt upgradable listing failed; reporting 0"
                    );
                    0
                }
                Err(e) => {
                    tracing::warn!(error = %e, "apt unavailable; reporting 0 pending updates");
                    0
                }
            }
        }
        OsFamily::RpmLike => {
            match exec::run_tolerant_with_timeout(
                "dnf",
                &["-q", "check-update"],
                &[],
                "dnf check-update",
                settings.package_timeout_secs,
            ) {
                Ok(cap) => match cap.exit_code {
                    Some(0) => 0,
                    // Exit code 100 is dnf's updates-available signal
                    Some(100) => parsing::count_dnf_updates(cap.stdout.as_bytes()),
                    other => {
                        tracing::warn!(
                            exit_code = ?other,
                            timed_out = cap.timed_out,
                            "dnf check-update failed; reporting 0"
                        );
                        0
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "dnf unavailable; reporting 0 pending updates");
                    0
                }
            }
        }
        OsFamily::Unsupported => {
            tracing::debug!("unsupported OS family; reporting 0 pending updates");
            0
        }
    }
}

/// What: Apply all pending upgrades non-interactively.
///
/// Inputs:
/// - `family`: Detected OS family.
/// - `settings`: Timeout configuration.
///
/// Output:
/// - `true` when the upgrade command succeeded; `false` otherwise
///   (including unsupported hosts, where nothing is attempted).
pub fn apply_upgrades(family: OsFamily, settings: &Settings) -> bool {
    let (program, args, envs): (&str, &[&str], &[(&str, &str)]) = match family {
        OsFamily::DebianLike => (
            "apt-get",
            &["-y", "upgrade"],
            &[("DEBIAN_FRONTEND", "noninteractive")],
        ),
        OsFamily::RpmLike => ("dnf", &["-y", "upgrade"], &[]),
        OsFamily::Unsupported => {
            tracing::debug!("unsupported OS family; skipping upgrade");
            return false;
        }
    };
    match exec::run_tolerant_with_timeout(
        program,
        args,
        envs,
        "package upgrade",
        settings.package_timeout_secs,
    ) {
        Ok(cap) if cap.success() => {
            tracing::info!(family = family.as_str(), "package upgrade completed");
            true
        }
        Ok(cap) => {
            tracing::warn!(
                family = family.as_str(),
                exit_code = ?cap.exit_code,
                timed_out = cap.timed_out,
                stderr = %cap.stderr.trim(),
                "package upgrade failed"
            );
            false
        }
        Err(e) => {
            tracing::warn!(family = family.as_str(), error = %e, "package upgrade unavailable");
            false
        }
    }
}

/// What: Remove packages that became orphaned by the upgrade.
///
/// Inputs:
/// - `family`: Detected OS family.
/// - `settings`: Timeout configuration.
///
/// Output:
/// - None; cleanup is best-effort.
pub fn cleanup(family: OsFamily, settings: &Settings) {
    let (program, args): (&str, &[&str]) = match family {
        OsFamily::DebianLike => ("apt-get", &["-y", "autoremove"]),
        OsFamily::RpmLike => ("dnf", &["-y", "autoremove"]),
        OsFamily::Unsupported => return,
    };
    match exec::run_tolerant_with_timeout(
        program,
        args,
        &[],
        "package cleanup",
        settings.package_timeout_secs,
    ) {
        Ok(cap) if cap.success() => {
            tracing::debug!(family = family.as_str(), "package cleanup completed");
        }
        Ok(cap) => {
            tracing::warn!(
                family = family.as_str(),
                exit_code = ?cap.exit_code,
                "package cleanup failed"
            );
        }
        Err(e) => {
            tracing::warn!(family = family.as_str(), error = %e, "package cleanup unavailable");
        }
    }
}

/// What: Full update pass: refresh, count, optionally apply and clean up.
///
/// Inputs:
/// - `family`: Detected OS family.
/// - `settings`: Timeout configuration.
/// - `apply`: Whether to install the pending upgrades after counting.
///
/// Output:
/// - The count observed **before** any apply step, so the persisted number
///   reflects what the run found rather than what it left behind.
///
/// Details:
/// - Index-refresh failures degrade to a stale count; apply failures are
///   logged and do not affect the returned value.
pub fn pending_updates(family: OsFamily, settings: &Settings, apply: bool) -> u64 {
    refresh_index(family, settings);
    let count = count_upgradable(family, settings);
    tracing::info!(
        family = family.as_str(),
        pending = count,
        "pending package updates counted"
    );
    if apply && family != OsFamily::Unsupported {
        if count == 0 {
            tracing::debug!("no pending updates; skipping upgrade");
        } else if apply_upgrades(family, settings) {
            cleanup(family, settings);
        }
    }
    count
}
