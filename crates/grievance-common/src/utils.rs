//! Grievance Utils - Utility Functions
//!
//! Formatting and parsing helpers shared by the client library and both
//! front-ends.
//!
//! Key Features:
//! - Human-readable file size formatting
//! - Rounded percentages that are safe for empty totals
//! - Mail address list parsing and joining
//! - Lenient timestamp parsing for server-formatted dates
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

// =============================================================================
// Size Formatting
// =============================================================================

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count with base 1024 and at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let rendered = format!("{:.2}", size);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit_index])
}

// =============================================================================
// Percentages
// =============================================================================

/// Integer percentage of `count` in `total`, rounded half away from zero.
/// Returns 0 when `total` is 0.
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 * 100.0 / total as f64).round() as u32
}

// =============================================================================
// Address Lists
// =============================================================================

/// Split a comma-separated address list, trimming and dropping empties.
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join addresses into the wire form.
pub fn join_addresses(addresses: &[String]) -> String {
    addresses.join(", ")
}

// =============================================================================
// Timestamps
// =============================================================================

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a server timestamp. Offset-less values are taken as UTC and bare
/// dates as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    // "2024-02-01T00:00:00" style values from the assign endpoint
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Display form of a date, e.g. `Jan 15, 2024`.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d, %Y").to_string()
}

/// Display form of a timestamp, e.g. `Jan 15, 2024 10:30`.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d, %Y %H:%M").to_string()
}

/// Display form of a phase target date.
pub fn format_target_date(date: &NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(245_760), "240 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(1024u64.pow(5)), "1024 TB");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(4, 4), 100);
    }

    #[test]
    fn test_address_lists() {
        let parsed = parse_addresses(" a@x.com, ,b@y.com,");
        assert_eq!(parsed, vec!["a@x.com".to_string(), "b@y.com".to_string()]);
        assert!(parse_addresses("").is_empty());
        assert_eq!(join_addresses(&parsed), "a@x.com, b@y.com");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let offset = parse_timestamp("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let spaced = parse_timestamp("2024-01-15 10:30:00.123").unwrap();
        assert_eq!(spaced.minute(), 30);

        let naive_t = parse_timestamp("2024-01-15T10:30:00").unwrap();
        assert_eq!(naive_t, rfc);

        let bare = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(bare.hour(), 0);

        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-02-01T00:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(parse_date("02/01/2024").is_none());
    }

    #[test]
    fn test_display_formats() {
        let dt = parse_timestamp("2024-01-05T09:07:00Z").unwrap();
        assert_eq!(format_date(&dt), "Jan 05, 2024");
        assert_eq!(format_datetime(&dt), "Jan 05, 2024 09:07");
    }
}
