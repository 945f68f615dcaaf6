//! Tolerant timestamp parsing for source metadata
//!
//! Sources report times in whatever shape their exporter produces: RFC3339
//! from cloud APIs, `YYYYMMDD_HHMMSS` stamps in file-store names, bare
//! dates in webhook payloads. Parsing tries each known shape in order and
//! keeps the wall-clock value (zones are dropped; week arithmetic only
//! needs calendar distance).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::EvidenceError;

/// Datetime shapes tried in order, most specific first
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y%m%d_%H%M%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only shapes, mapped to midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y", "%b %d, %Y"];

/// Parse a raw timestamp string from source metadata
///
/// # Errors
/// Returns `EvidenceError::TimestampParse` when no known shape matches;
/// callers record the error as evidence rather than failing the pass.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, EvidenceError> {
    let trimmed = raw.trim();

    // RFC3339 first (cloud API shape); keep the reported wall clock
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(EvidenceError::TimestampParse(format!(
        "unrecognized timestamp: {:?}",
        trimmed
    )))
}

/// Find a date stamp embedded in free text (file names, folder segments)
///
/// Recognizes `2025-03-04` and `20250304` shapes. Returns the first
/// plausible date (year 2000-2099) so decade-old archive names don't
/// produce nonsense.
pub fn scan_date_stamp(text: &str) -> Option<NaiveDate> {
    // `\b` would not fire after `_`, and file names glue stamps to
    // underscored prefixes ("Ada_Grace_2025-03-04"), so the left edge is
    // any non-digit
    static DASHED: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?:^|[^0-9])(20\d{2})-(\d{2})-(\d{2})\b").expect("invalid date pattern")
    });
    // No leading boundary: exporters glue stamps to prefixes ("GMT20250304")
    static COMPACT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(20\d{2})(\d{2})(\d{2})\b").expect("invalid date pattern"));

    for re in [&*DASHED, &*COMPACT] {
        for caps in re.captures_iter(text) {
            let year: i32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let day: u32 = caps[3].parse().ok()?;
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_wall_clock() {
        let dt = parse_timestamp("2025-03-04T16:00:00Z").unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap().and_hms_opt(16, 0, 0).unwrap());

        // Offset forms keep the local reading, not a UTC conversion
        let dt = parse_timestamp("2025-03-04T16:00:00-05:00").unwrap();
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    }

    #[test]
    fn test_plain_datetime_forms() {
        assert!(parse_timestamp("2025-03-04 16:00:00").is_ok());
        assert!(parse_timestamp("2025-03-04T16:00:00").is_ok());
        assert!(parse_timestamp("03/04/2025 16:00").is_ok());
    }

    #[test]
    fn test_file_store_stamp() {
        let dt = parse_timestamp("20250304_160000").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    }

    #[test]
    fn test_date_only_maps_to_midnight() {
        let dt = parse_timestamp("2025-03-04").unwrap();
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert!(parse_timestamp("Mar 4, 2025").is_ok());
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = parse_timestamp("next tuesday").unwrap_err();
        assert!(matches!(err, EvidenceError::TimestampParse(_)));
    }

    #[test]
    fn test_scan_date_stamp_dashed() {
        let date = scan_date_stamp("Ada_Grace_2025-03-04.mp4").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());

        // Also at the start of the text and after a space
        let date = scan_date_stamp("2025-03-04 session").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        let date = scan_date_stamp("session 2025-03-04").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }

    #[test]
    fn test_scan_date_stamp_rejects_digit_glued_prefix() {
        // "12025" is not a year 2025 stamp
        assert_eq!(scan_date_stamp("rev12025-03-04"), None);
    }

    #[test]
    fn test_scan_date_stamp_compact() {
        let date = scan_date_stamp("GMT20250304-160012_Recording").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    }

    #[test]
    fn test_scan_date_stamp_ignores_invalid_calendar_dates() {
        assert_eq!(scan_date_stamp("snapshot 2025-13-40 end"), None);
        assert_eq!(scan_date_stamp("no dates here"), None);
    }
}
