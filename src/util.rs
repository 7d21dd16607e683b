//! Small shared helpers: numeric sanitizing and timestamp formatting.

/// What: Reduce untrusted numeric text to a count that is safe to persist.
///
/// Inputs:
/// - `raw`: Candidate string captured from external command output.
///
/// Output:
/// - Parsed value when `raw` is entirely ASCII digits; `0` otherwise.
///
/// Details:
/// - The whole string must be digits. Whitespace and newlines count as
///   non-digits, so multi-line or padded captures collapse to `0`; callers
///   trim at the capture boundary when padding is expected.
/// - Never fails; downstream consumers always receive a usable count.
#[must_use]
pub fn sanitize_count(raw: &str) -> u64 {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    raw.parse::<u64>().unwrap_or(0)
}

/// Current local time as `YYYY-MM-DD HH:MM:SS`, the format the status record
/// and log lines use.
#[must_use]
pub fn now_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// What: Render a duration since a past moment as a coarse human age.
///
/// Inputs:
/// - `secs`: Elapsed seconds (saturating; negative clock skew maps to 0).
///
/// Output:
/// - `"today"`, `"1 day ago"` or `"N days ago"`.
#[must_use]
pub fn age_in_days(secs: u64) -> String {
    let days = secs / 86_400;
    match days {
        0 => "today".to_string(),
        1 => "1 day ago".to_string(),
        n => format!("{n} days ago"),
    }
}
