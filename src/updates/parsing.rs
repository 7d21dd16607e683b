//! Pure counting parsers over package-manager listing output.

/// What: Count upgradable packages in `apt list --upgradable` output.
///
/// Inputs:
/// - `output`: Raw stdout bytes from the command.
///
/// Output:
/// - Number of package lines.
///
/// Details:
/// - Package lines carry an `[upgradable from: ...]` suffix; the leading
///   `Listing... Done` banner and blank lines never match.
#[must_use]
pub fn count_apt_upgradable(output: &[u8]) -> u64 {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|line| line.contains("upgradable from"))
        .count() as u64
}

/// What: Count pending updates in `dnf -q check-update` output.
///
/// Inputs:
/// - `output`: Raw stdout bytes from the command.
///
/// Output:
/// - Number of package lines.
///
/// Details:
/// - Package lines start at column zero with `name.arch  version  repo`;
///   the `Obsoleting Packages` section and its indented continuation lines
///   are excluded.
#[must_use]
pub fn count_dnf_updates(output: &[u8]) -> u64 {
    let text = String::from_utf8_lossy(output);
    let mut count: u64 = 0;
    let mut in_obsoleting = false;
    for line in text.lines() {
        let trimmed_end = line.trim_end();
        if trimmed_end.is_empty() {
            continue;
        }
        if trimmed_end.starts_with("Obsoleting Packages") {
            in_obsoleting = true;
            continue;
        }
        if in_obsoleting {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let fields: Vec<&str> = trimmed_end.split_whitespace().collect();
        if fields.len() >= 3 && fields[0].contains('.') {
            count += 1;
        }
    }
    count
}
