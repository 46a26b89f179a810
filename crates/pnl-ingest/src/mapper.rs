//! Field mapper: raw records → canonical trades.
//!
//! For every record, each canonical field is resolved by walking the
//! profile's synonym list in order and taking the first column whose value is
//! non-empty. Values are then normalized per the profile (side tokens,
//! number decoration, date layout).
//!
//! Rows that still fail the canonical invariants are **dropped silently**:
//! - empty symbol
//! - quantity not a finite number > 0
//! - price not a finite number >= 0
//! - empty date
//! - side token the profile does not treat as a trade
//!
//! The mapper never returns an error. A source that maps to zero trades only
//! becomes a failure when the whole session has none
//! ([`crate::IngestError::NoTradeDataExtracted`]).

use chrono::{NaiveDate, NaiveDateTime};
use pnl_ledger::{normalize_iso_date, CanonicalTrade, Side};
use tracing::trace;

use crate::profile::{BrokerProfile, CanonicalField, DateStyle, NumberStyle};
use crate::rows::RawRecord;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Trades mapped from one source plus the number of rows discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRows {
    pub trades: Vec<CanonicalTrade>,
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// Map every record with `profile`, keeping source order.
pub fn map_records(profile: &BrokerProfile, records: &[RawRecord]) -> MappedRows {
    let mut trades = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for (i, rec) in records.iter().enumerate() {
        match map_record(profile, rec) {
            Some(t) => trades.push(t),
            None => {
                trace!(row = i + 1, broker = %profile.id, "row dropped");
                dropped += 1;
            }
        }
    }

    MappedRows { trades, dropped }
}

/// Map one record; `None` when the row fails the canonical invariants.
pub fn map_record(profile: &BrokerProfile, record: &RawRecord) -> Option<CanonicalTrade> {
    let field = |f: CanonicalField| resolve(record, profile.synonyms.for_field(f));

    let mut quantity = parse_number(profile.number_style, field(CanonicalField::Quantity));
    if profile.unsigned_quantity {
        quantity = quantity.abs();
    }

    let trade = CanonicalTrade {
        symbol: field(CanonicalField::Symbol).trim().to_string(),
        side: normalize_side(profile, field(CanonicalField::Side))?,
        quantity,
        price: parse_number(profile.number_style, field(CanonicalField::Price)),
        date: normalize_date(profile.date_style, field(CanonicalField::Date)),
        realized_pnl: None,
    };

    trade.is_well_formed().then_some(trade)
}

/// First non-empty value among `synonyms`, or `""`.
fn resolve<'a>(record: &'a RawRecord, synonyms: &[&str]) -> &'a str {
    synonyms
        .iter()
        .filter_map(|name| record.get(name))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// Normalizers
// ---------------------------------------------------------------------------

/// Case-insensitive side mapping. Profile buy tokens → Buy. With no sell
/// tokens configured anything else (including an empty value) → Sell;
/// otherwise only sell tokens → Sell and the rest → `None`.
pub fn normalize_side(profile: &BrokerProfile, raw: &str) -> Option<Side> {
    let token = raw.trim().to_ascii_lowercase();
    if profile.buy_tokens.iter().any(|b| *b == token) {
        Some(Side::Buy)
    } else if profile.sell_tokens.is_empty() || profile.sell_tokens.iter().any(|s| *s == token) {
        Some(Side::Sell)
    } else {
        None
    }
}

/// Parse a decimal per the profile's number style. Returns NaN when the value
/// is empty or not a finite number.
pub fn parse_number(style: NumberStyle, raw: &str) -> f64 {
    let s = raw.trim();

    let parsed = match style {
        NumberStyle::Plain => s.parse::<f64>().ok(),
        NumberStyle::Currency => parse_currency(s),
    };

    parsed.filter(|v| v.is_finite()).unwrap_or(f64::NAN)
}

/// `$1,234.50` → 1234.5, `($3.10)` → -3.1, `-$2` → -2.
fn parse_currency(s: &str) -> Option<f64> {
    let (negative, body) = match s.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, s),
    };

    let cleaned: String = body.chars().filter(|c| *c != '$' && *c != ',').collect();
    let v = cleaned.trim().parse::<f64>().ok()?;
    Some(if negative { -v } else { v })
}

const COMPACT_DATETIMES: &[&str] = &["%Y%m%d;%H%M%S", "%Y-%m-%d, %H:%M:%S", "%Y%m%d %H%M%S"];
const COMPACT_DATES: &[&str] = &["%Y%m%d"];
const MONTH_DAY_YEAR_DATETIMES: &[&str] = &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];
const MONTH_DAY_YEAR_DATES: &[&str] = &["%m/%d/%Y"];
const LONG_DATES: &[&str] = &["%b %d, %Y", "%B %d, %Y"];

/// Rewrite a broker date into ISO form. Values that do not match the profile's
/// layout are kept trimmed but otherwise untouched.
pub fn normalize_date(style: DateStyle, raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    let parsed = match style {
        DateStyle::Flexible => parse_layouts(s, MONTH_DAY_YEAR_DATETIMES, MONTH_DAY_YEAR_DATES)
            .or_else(|| parse_layouts(s, &[], LONG_DATES)),
        DateStyle::Compact => parse_layouts(s, COMPACT_DATETIMES, COMPACT_DATES),
        DateStyle::MonthDayYear => parse_layouts(s, MONTH_DAY_YEAR_DATETIMES, MONTH_DAY_YEAR_DATES),
    };

    match parsed {
        Some(dt) => normalize_iso_date(dt),
        None => s.to_string(),
    }
}

/// First matching date-time layout, then first matching date-only layout
/// (at midnight).
fn parse_layouts(s: &str, datetimes: &[&str], dates: &[&str]) -> Option<NaiveDateTime> {
    datetimes
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            dates
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
