//! OS-family detection driving the package-update prober.

/// Package-manager lineage of the host.
///
/// Branching on this enum is the single point of OS awareness; callers never
/// re-inspect release files themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OsFamily {
    /// apt-based systems (Debian, Ubuntu and derivatives).
    DebianLike,
    /// dnf-based systems (Fedora, RHEL, CentOS and derivatives).
    RpmLike,
    /// Anything else; update operations become no-ops.
    Unsupported,
}

impl OsFamily {
    /// Stable textual form for logs and the dashboard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DebianLike => "debian-like",
            Self::RpmLike => "rpm-like",
            Self::Unsupported => "unsupported",
        }
    }

    /// Systemd timers that drive unattended OS updates on this family.
    #[must_use]
    pub const fn auto_update_timers(self) -> &'static [&'static str] {
        match self {
            Self::DebianLike => &["apt-daily.timer", "apt-daily-upgrade.timer"],
            Self::RpmLike => &["dnf-automatic.timer"],
            Self::Unsupported => &[],
        }
    }
}

/// What: Classify a host from `/etc/os-release` content.
///
/// Inputs:
/// - `content`: Raw file content.
///
/// Output:
/// - Family derived from the `ID` and `ID_LIKE` fields; `Unsupported` when
///   neither matches a known lineage.
///
/// Details:
/// - Values may be quoted and `ID_LIKE` may list several tokens
///   (`ID_LIKE="rhel centos fedora"`); all tokens are considered.
#[must_use]
pub fn family_from_os_release(content: &str) -> OsFamily {
    let mut tokens: Vec<String> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        let value = if let Some(v) = trimmed.strip_prefix("ID=") {
            v
        } else if let Some(v) = trimmed.strip_prefix("ID_LIKE=") {
            v
        } else {
            continue;
        };
        let unquoted = value.trim().trim_matches('"').trim_matches('\'');
        for tok in unquoted.split_whitespace() {
            tokens.push(tok.to_ascii_lowercase());
        }
    }

    let is = |needle: &str| tokens.iter().any(|t| t == needle);
    if is("debian") || is("ubuntu") {
        OsFamily::DebianLike
    } else if is("fedora") || is("rhel") || is("centos") {
        OsFamily::RpmLike
    } else {
        OsFamily::Unsupported
    }
}

/// What: Detect the host's family, preferring `/etc/os-release`.
///
/// Output:
/// - Family from the release file when conclusive; otherwise a PATH probe
///   for `apt-get`/`dnf` decides; `Unsupported` when neither exists.
#[must_use]
pub fn detect_family() -> OsFamily {
    if let Ok(content) = std::fs::read_to_string("/etc/os-release") {
        let family = family_from_os_release(&content);
        if family != OsFamily::Unsupported {
            tracing::debug!(family = family.as_str(), "detected OS family from os-release");
            return family;
        }
    }
    // Release file absent or inconclusive: fall back to looking for the
    // package managers themselves.
    if which::which("apt-get").is_ok() {
        tracing::debug!("detected OS family from apt-get on PATH");
        return OsFamily::DebianLike;
    }
    if which::which("dnf").is_ok() {
        tracing::debug!("detected OS family from dnf on PATH");
        return OsFamily::RpmLike;
    }
    tracing::debug!("no supported package manager found");
    OsFamily::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Direct IDs classify without needing ID_LIKE.
    ///
    /// Inputs:
    /// - Minimal os-release bodies for Debian and Fedora.
    ///
    /// Output:
    /// - `DebianLike` and `RpmLike` respectively.
    fn family_from_direct_id() {
        assert_eq!(
            family_from_os_release("ID=debian\nVERSION_ID=\"13\"\n"),
            OsFamily::DebianLike
        );
        assert_eq!(
            family_from_os_release("ID=fedora\nVERSION_ID=42\n"),
            OsFamily::RpmLike
        );
    }

    #[test]
    /// What: Derivatives resolve through ID_LIKE token lists.
    ///
    /// Inputs:
    /// - Linux Mint (`ID_LIKE="ubuntu debian"`) and Rocky
    ///   (`ID_LIKE="rhel centos fedora"`) style content with quoting.
    ///
    /// Output:
    /// - Mapped to their parent family.
    fn family_from_id_like_tokens() {
        let mint = "ID=linuxmint\nID_LIKE=\"ubuntu debian\"\n";
        assert_eq!(family_from_os_release(mint), OsFamily::DebianLike);
        let rocky = "ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n";
        assert_eq!(family_from_os_release(rocky), OsFamily::RpmLike);
    }

    #[test]
    fn family_unknown_is_unsupported() {
        assert_eq!(
            family_from_os_release("ID=arch\nID_LIKE=\n"),
            OsFamily::Unsupported
        );
        assert_eq!(family_from_os_release(""), OsFamily::Unsupported);
    }

    #[test]
    /// What: Each family names its unattended-update timers.
    ///
    /// Inputs:
    /// - All three family variants.
    ///
    /// Output:
    /// - apt timers for Debian-like, the dnf-automatic timer for RPM-like,
    ///   nothing for unsupported hosts.
    fn auto_update_timers_per_family() {
        assert_eq!(
            OsFamily::DebianLike.auto_update_timers(),
            ["apt-daily.timer", "apt-daily-upgrade.timer"]
        );
        assert_eq!(
            OsFamily::RpmLike.auto_update_timers(),
            ["dnf-automatic.timer"]
        );
        assert!(OsFamily::Unsupported.auto_update_timers().is_empty());
    }
}
