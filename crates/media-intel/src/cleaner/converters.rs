//! Value conversion functions for data cleaning.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date-time layouts tried after RFC 3339 / RFC 2822.
const DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M",
];

/// Plain date layouts. Month-first wins over day-first when both fit, and
/// two-digit years are tried before four-digit ones.
const DATE_FORMATS: [&str; 12] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%Y.%m.%d",
];

/// Years outside this range are treated as misparses (e.g. `1/5/24` read
/// as year 1).
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1677..=2262;

fn in_supported_range(date: NaiveDate) -> Option<NaiveDate> {
    SUPPORTED_YEARS.contains(&date.year()).then_some(date)
}

/// Parse a date leniently, accepting the usual spreadsheet and ISO forms.
///
/// Time-zone aware values keep their own local calendar date.
pub(crate) fn parse_lenient_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return in_supported_range(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return in_supported_range(dt.date_naive());
    }

    let from_datetime = DATETIME_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .and_then(|dt| in_supported_range(dt.date()))
    });
    if from_datetime.is_some() {
        return from_datetime;
    }

    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(trimmed, format)
            .ok()
            .and_then(in_supported_range)
    })
}

/// Format a date the way the cleaned table stores it.
pub(crate) fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Coerce an engagements cell to a non-negative integer.
///
/// Returns `None` when the value had to be defaulted (missing, unparseable,
/// negative or non-finite); callers substitute `0`. Fractions truncate.
pub(crate) fn coerce_engagements(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(int_val) = trimmed.parse::<i64>() {
        return (int_val >= 0).then_some(int_val);
    }

    match trimmed.parse::<f64>() {
        Ok(float_val) if float_val.is_finite() && float_val >= 0.0 => Some(float_val as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========================================================================
    // parse_lenient_date() tests
    // ========================================================================

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_lenient_date("2024-01-01"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_lenient_date(" 2024-03-05 "), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert_eq!(
            parse_lenient_date("2024-01-15 10:30:00"),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(
            parse_lenient_date("2024-01-15T10:30:00"),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(
            parse_lenient_date("2024-01-15T23:30:00-05:00"),
            Some(ymd(2024, 1, 15))
        );
        assert_eq!(
            parse_lenient_date("2024-01-15T10:30:00Z"),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn test_parse_slash_forms() {
        assert_eq!(parse_lenient_date("01/15/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_lenient_date("1/5/2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_lenient_date("2024/01/15"), Some(ymd(2024, 1, 15)));
        // Day-first only when month-first cannot apply
        assert_eq!(parse_lenient_date("25/12/2024"), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_lenient_date("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_lenient_date("1/5/24"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_lenient_date("Jan 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_lenient_date("January 5, 2024"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_lenient_date("5 Jan 2024"), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_lenient_date("not-a-date"), None);
        assert_eq!(parse_lenient_date(""), None);
        assert_eq!(parse_lenient_date("   "), None);
        assert_eq!(parse_lenient_date("2024-13-40"), None);
        assert_eq!(parse_lenient_date("yesterday"), None);
        assert_eq!(parse_lenient_date("0001-01-01"), None);
    }

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date(ymd(2024, 1, 5)), "2024-01-05");
    }

    // ========================================================================
    // coerce_engagements() tests
    // ========================================================================

    #[test]
    fn test_coerce_integers() {
        assert_eq!(coerce_engagements(Some("10")), Some(10));
        assert_eq!(coerce_engagements(Some(" 42 ")), Some(42));
        assert_eq!(coerce_engagements(Some("0")), Some(0));
    }

    #[test]
    fn test_coerce_floats_truncate() {
        assert_eq!(coerce_engagements(Some("10.9")), Some(10));
        assert_eq!(coerce_engagements(Some("1e3")), Some(1000));
    }

    #[test]
    fn test_coerce_defaults() {
        assert_eq!(coerce_engagements(Some("abc")), None);
        assert_eq!(coerce_engagements(Some("")), None);
        assert_eq!(coerce_engagements(None), None);
        assert_eq!(coerce_engagements(Some("-5")), None);
        assert_eq!(coerce_engagements(Some("NaN")), None);
        assert_eq!(coerce_engagements(Some("inf")), None);
        assert_eq!(coerce_engagements(Some("1,234")), None);
    }
}
