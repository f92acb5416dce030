//! Presentation helpers shared by page view models: badges and formatting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Timestamp;

/// Colour family a badge is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

/// Anything rendered as a coloured label (severity, status, role, ...).
pub trait Badge {
    fn label(&self) -> &'static str;
    fn tone(&self) -> Tone;

    fn badge(&self) -> BadgeView {
        BadgeView {
            label: self.label(),
            tone: self.tone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeView {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge for crate::roles::Role {
    fn label(&self) -> &'static str {
        crate::roles::Role::label(*self)
    }

    fn tone(&self) -> Tone {
        use crate::roles::Role;
        match self {
            Role::Employee => Tone::Neutral,
            Role::Manager => Tone::Info,
            Role::SafetyOfficer => Tone::Warning,
            Role::Admin => Tone::Danger,
        }
    }
}

/// `16 Oct 2026`
pub fn format_date(ts: &Timestamp) -> String {
    ts.format("%d %b %Y").to_string()
}

/// `16 Oct 2026, 14:05`
pub fn format_datetime(ts: &Timestamp) -> String {
    ts.format("%d %b %Y, %H:%M").to_string()
}

/// Coarse relative time (`just now`, `5 minutes ago`, `3 days ago`).
///
/// Falls back to [`format_date`] beyond thirty days.
pub fn relative_time(ts: &Timestamp, now: DateTime<Utc>) -> String {
    let secs = (now - *ts).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let (value, unit) = if secs < 3_600 {
        (secs / 60, "minute")
    } else if secs < 86_400 {
        (secs / 3_600, "hour")
    } else if secs < 30 * 86_400 {
        (secs / 86_400, "day")
    } else {
        return format_date(ts);
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}

/// Join optional name parts, skipping blanks.
pub fn full_name(first: &str, last: &str) -> String {
    [first.trim(), last.trim()]
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shorten long text for table cells, cutting on a char boundary.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::roles::Role;

    #[test]
    fn role_badges_have_labels() {
        let badge = Role::SafetyOfficer.badge();
        assert_eq!(badge.label, "Safety Officer");
        assert_eq!(badge.tone, Tone::Warning);
    }

    #[test]
    fn dates_are_formatted() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 16, 14, 5, 0).unwrap();
        assert_eq!(format_date(&ts), "16 Oct 2026");
        assert_eq!(format_datetime(&ts), "16 Oct 2026, 14:05");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(relative_time(&(now - Duration::seconds(10)), now), "just now");
        assert_eq!(relative_time(&(now - Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(relative_time(&(now - Duration::hours(5)), now), "5 hours ago");
        assert_eq!(relative_time(&(now - Duration::days(3)), now), "3 days ago");
        assert_eq!(relative_time(&(now - Duration::days(45)), now), "01 Sep 2026");
    }

    #[test]
    fn names_and_truncation() {
        assert_eq!(full_name("Ada", "Lovelace"), "Ada Lovelace");
        assert_eq!(full_name(" ", "Lovelace"), "Lovelace");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a rather long description", 8), "a rathe…");
    }
}
