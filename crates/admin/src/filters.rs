//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use depot_core::{format_money, parse_money};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an amount as `$1234.50`; anything unparseable renders as-is.
///
/// Usage in templates: `{{ order.total|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = value.to_string();
    Ok(parse_money(&raw).map_or(raw, format_money))
}

/// Shortens a backend timestamp to `YYYY-MM-DD HH:MM`.
///
/// Usage in templates: `{{ transfer.created_at|timestamp }}`
#[askama::filter_fn]
pub fn timestamp(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string()))
}

/// Normalize the timestamp spellings the backend uses (RFC 3339, naive
/// `YYYY-MM-DD HH:MM:SS`, bare dates). Unknown shapes pass through.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.to_string();
    }
    raw.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shapes() {
        assert_eq!(format_timestamp("2024-03-05T14:22:10Z"), "2024-03-05 14:22");
        assert_eq!(
            format_timestamp("2024-03-05T14:22:10.123+02:00"),
            "2024-03-05 14:22"
        );
        assert_eq!(format_timestamp("2024-03-05 09:01:00"), "2024-03-05 09:01");
        assert_eq!(format_timestamp("2024-03-05T09:01:00.5"), "2024-03-05 09:01");
        assert_eq!(format_timestamp("2024-03-05"), "2024-03-05");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
