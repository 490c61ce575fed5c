//! Date helper functions

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a front-matter date string in the formats editors actually use.
///
/// Naive values (no offset) are read as UTC so that ordering does not
/// depend on the machine the index is built on.
///
/// # Examples
/// ```ignore
/// parse_date_string("2024-01-15") // -> 2024-01-15T00:00:00Z
/// ```
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Format a date for RSS `pubDate` / `lastBuildDate`
pub fn date_rfc2822(date: &DateTime<Utc>) -> String {
    date.to_rfc2822()
}

/// Format a date for sitemap `lastmod` (W3C datetime)
pub fn date_w3c(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Short calendar date used in listings
pub fn short_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Whether `date` falls within `days` days before `now`
pub fn within_days(date: &DateTime<Utc>, now: &DateTime<Utc>, days: i64) -> bool {
    let age = now.signed_duration_since(*date);
    age >= Duration::zero() && age < Duration::days(days)
}
