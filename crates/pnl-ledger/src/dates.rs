//! Trade-date parsing for replay ordering.
//!
//! Canonical trades carry their date as an ISO-comparable string. The ledger
//! parses it once per replay to obtain a sort key; the string itself is never
//! rewritten.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Accepted naive layouts, tried in order after RFC 3339.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"];

/// Parse a canonical trade date into a UTC-naive timestamp.
///
/// Rules:
/// - RFC 3339 with offset (`2023-01-15T10:00:00-05:00`) is converted to UTC.
/// - Naive date-times are taken as UTC.
/// - Bare dates are midnight UTC.
/// - US `M/D/YYYY` (optionally with `HH:MM[:SS]`) and `Jan 15, 2023` are
///   accepted for structured trades that never went through a broker profile.
/// - Anything else returns `None`; such trades sort after every dated trade.
pub fn parse_trade_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Render a timestamp back as an ISO string: `YYYY-MM-DD` at midnight,
/// `YYYY-MM-DDTHH:MM:SS` otherwise.
pub fn normalize_iso_date(dt: NaiveDateTime) -> String {
    if dt.time() == chrono::NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
