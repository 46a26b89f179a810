//! Broker profiles and format detection.
//!
//! Each supported export layout is one [`BrokerId`] variant backed by a static
//! [`BrokerProfile`]: the header columns that identify it, an ordered synonym
//! table per canonical field, the tokens that mean "buy", and how its dates and
//! numbers are written. Adding a broker means adding a variant and a profile
//! static; nothing else in the crate branches on broker names.
//!
//! # Detection
//! Profiles are tried in [`BrokerId::DETECTION_ORDER`] (most specific first).
//! Generic has no required headers and therefore always matches last.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Broker identity
// ---------------------------------------------------------------------------

/// Closed set of supported export layouts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrokerId {
    Generic,
    InteractiveBrokers,
    Robinhood,
}

impl BrokerId {
    /// Auto-detection priority. Generic must stay last.
    pub const DETECTION_ORDER: [BrokerId; 3] = [
        BrokerId::InteractiveBrokers,
        BrokerId::Robinhood,
        BrokerId::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerId::Generic => "generic",
            BrokerId::InteractiveBrokers => "interactive-brokers",
            BrokerId::Robinhood => "robinhood",
        }
    }

    pub fn profile(&self) -> &'static BrokerProfile {
        match self {
            BrokerId::Generic => &GENERIC,
            BrokerId::InteractiveBrokers => &INTERACTIVE_BROKERS,
            BrokerId::Robinhood => &ROBINHOOD,
        }
    }

    /// Parse a broker name. Accepts the canonical id plus common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Some(BrokerId::Generic),
            "interactive-brokers" | "interactivebrokers" | "interactive_brokers" | "ibkr" => {
                Some(BrokerId::InteractiveBrokers)
            }
            "robinhood" => Some(BrokerId::Robinhood),
            _ => None,
        }
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Caller's broker choice: the `any`/`auto` wildcard or a named profile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BrokerSelector {
    #[default]
    Auto,
    Named(BrokerId),
}

impl BrokerSelector {
    /// Parse a selector. Never fails: unknown names select Generic.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("any") || t.eq_ignore_ascii_case("auto") {
            return BrokerSelector::Auto;
        }
        match BrokerId::parse(t) {
            Some(id) => BrokerSelector::Named(id),
            None => {
                warn!(requested = %t, "unknown broker requested; using generic profile");
                BrokerSelector::Named(BrokerId::Generic)
            }
        }
    }
}

impl FromStr for BrokerSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BrokerSelector::parse(s))
    }
}

impl fmt::Display for BrokerSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerSelector::Auto => f.write_str("any"),
            BrokerSelector::Named(id) => id.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile definition
// ---------------------------------------------------------------------------

/// Canonical trade fields a profile must resolve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Symbol,
    Side,
    Quantity,
    Price,
    Date,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Symbol,
        CanonicalField::Side,
        CanonicalField::Quantity,
        CanonicalField::Price,
        CanonicalField::Date,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Symbol => "symbol",
            CanonicalField::Side => "side",
            CanonicalField::Quantity => "quantity",
            CanonicalField::Price => "price",
            CanonicalField::Date => "date",
        }
    }
}

/// Ordered raw column names accepted for each canonical field.
#[derive(Debug, Clone)]
pub struct ColumnSynonyms {
    pub symbol: &'static [&'static str],
    pub side: &'static [&'static str],
    pub quantity: &'static [&'static str],
    pub price: &'static [&'static str],
    pub date: &'static [&'static str],
}

impl ColumnSynonyms {
    pub fn for_field(&self, field: CanonicalField) -> &'static [&'static str] {
        match field {
            CanonicalField::Symbol => self.symbol,
            CanonicalField::Side => self.side,
            CanonicalField::Quantity => self.quantity,
            CanonicalField::Price => self.price,
            CanonicalField::Date => self.date,
        }
    }
}

/// How a profile writes trade dates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DateStyle {
    /// ISO values are kept as written. US `M/D/YYYY` (optionally with
    /// `HH:MM[:SS]`) and `Jan 15, 2023` are rewritten to ISO.
    Flexible,
    /// `YYYYMMDD`, `YYYYMMDD;HHMMSS`, `YYYY-MM-DD, HH:MM:SS` (or ISO).
    Compact,
    /// `M/D/YYYY` (US order), optionally with `HH:MM[:SS]`.
    MonthDayYear,
}

/// How a profile writes numbers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumberStyle {
    /// Plain decimal: `1234.5`.
    Plain,
    /// Currency-decorated: `$1,234.50`, `($3.10)` for negatives.
    Currency,
}

/// A named parsing strategy for one export layout.
#[derive(Debug, Clone)]
pub struct BrokerProfile {
    pub id: BrokerId,
    pub name: &'static str,
    /// Headers that must all be present for detection (case-insensitive).
    /// Empty means "always matches".
    pub detection_headers: &'static [&'static str],
    pub synonyms: ColumnSynonyms,
    /// Lower-case side tokens meaning buy.
    pub buy_tokens: &'static [&'static str],
    /// Lower-case side tokens meaning sell. Empty means every non-buy token
    /// is a sell; otherwise a token in neither list drops the row.
    pub sell_tokens: &'static [&'static str],
    pub date_style: DateStyle,
    pub number_style: NumberStyle,
    /// Take the absolute quantity (layouts that sign sells negative).
    pub unsigned_quantity: bool,
}

impl BrokerProfile {
    /// Whether this profile recognizes the given header row.
    pub fn detect(&self, header: &[String]) -> bool {
        self.detection_headers
            .iter()
            .all(|want| header.iter().any(|h| h.trim().eq_ignore_ascii_case(want)))
    }

    /// For each canonical field, the first synonym present in `header`.
    ///
    /// Per-row mapping may still fall through to a later synonym when this
    /// column is blank on a given row.
    pub fn resolve_columns(&self, header: &[String]) -> Vec<(CanonicalField, Option<String>)> {
        CanonicalField::ALL
            .iter()
            .map(|field| {
                let hit = self.synonyms.for_field(*field).iter().find_map(|syn| {
                    header
                        .iter()
                        .find(|h| h.trim().eq_ignore_ascii_case(syn))
                        .cloned()
                });
                (*field, hit)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Hand-made or tool-made exports using common English column names.
pub static GENERIC: BrokerProfile = BrokerProfile {
    id: BrokerId::Generic,
    name: "Generic CSV",
    detection_headers: &[],
    synonyms: ColumnSynonyms {
        symbol: &["symbol", "ticker", "asset"],
        side: &["side", "type", "action"],
        quantity: &["quantity", "amount", "shares", "units"],
        price: &["price", "cost", "value"],
        date: &["date", "timestamp", "time"],
    },
    buy_tokens: &["buy", "b"],
    sell_tokens: &[],
    date_style: DateStyle::Flexible,
    number_style: NumberStyle::Plain,
    unsigned_quantity: false,
};

/// Interactive Brokers Flex Query trade export.
pub static INTERACTIVE_BROKERS: BrokerProfile = BrokerProfile {
    id: BrokerId::InteractiveBrokers,
    name: "Interactive Brokers",
    detection_headers: &["Buy/Sell", "TradePrice"],
    synonyms: ColumnSynonyms {
        symbol: &["Symbol", "UnderlyingSymbol"],
        side: &["Buy/Sell", "Side"],
        quantity: &["Quantity"],
        price: &["TradePrice", "Price"],
        date: &["TradeDate", "DateTime", "Date/Time"],
    },
    buy_tokens: &["buy", "b", "bot"],
    sell_tokens: &[],
    date_style: DateStyle::Compact,
    number_style: NumberStyle::Plain,
    unsigned_quantity: true,
};

/// Robinhood account activity report. The same report carries option
/// (`BTO`, `STC`, ...) and cash rows under the underlying's Instrument, so
/// only `Buy`/`Sell` codes are trades.
pub static ROBINHOOD: BrokerProfile = BrokerProfile {
    id: BrokerId::Robinhood,
    name: "Robinhood",
    detection_headers: &["Activity Date", "Trans Code"],
    synonyms: ColumnSynonyms {
        symbol: &["Instrument"],
        side: &["Trans Code"],
        quantity: &["Quantity"],
        price: &["Price"],
        date: &["Activity Date"],
    },
    buy_tokens: &["buy", "b"],
    sell_tokens: &["sell", "s"],
    date_style: DateStyle::MonthDayYear,
    number_style: NumberStyle::Currency,
    unsigned_quantity: false,
};

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Pick the first profile (in priority order) whose `detect` matches.
pub fn detect_profile(header: &[String]) -> &'static BrokerProfile {
    BrokerId::DETECTION_ORDER
        .iter()
        .map(BrokerId::profile)
        .find(|p| p.detect(header))
        .unwrap_or(&GENERIC)
}

/// Resolve the caller's selector: a named broker bypasses detection.
pub fn select_profile(selector: BrokerSelector, header: &[String]) -> &'static BrokerProfile {
    match selector {
        BrokerSelector::Named(id) => id.profile(),
        BrokerSelector::Auto => detect_profile(header),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn generic_header_detects_generic() {
        let h = header(&["symbol", "side", "quantity", "price", "date"]);
        assert_eq!(detect_profile(&h).id, BrokerId::Generic);
    }

    #[test]
    fn ibkr_header_detected_case_insensitively() {
        let h = header(&["symbol", "buy/sell", "quantity", "tradeprice", "tradedate"]);
        assert_eq!(detect_profile(&h).id, BrokerId::InteractiveBrokers);
    }

    #[test]
    fn robinhood_header_detected() {
        let h = header(&[
            "Activity Date",
            "Process Date",
            "Settle Date",
            "Instrument",
            "Description",
            "Trans Code",
            "Quantity",
            "Price",
            "Amount",
        ]);
        assert_eq!(detect_profile(&h).id, BrokerId::Robinhood);
    }

    #[test]
    fn partial_match_falls_back_to_generic() {
        let h = header(&["Symbol", "Buy/Sell", "Quantity", "Price"]);
        assert_eq!(detect_profile(&h).id, BrokerId::Generic);
    }

    #[test]
    fn named_selector_bypasses_detection() {
        let h = header(&["Activity Date", "Trans Code"]);
        let p = select_profile(BrokerSelector::Named(BrokerId::Generic), &h);
        assert_eq!(p.id, BrokerId::Generic);
        let p = select_profile(BrokerSelector::Auto, &h);
        assert_eq!(p.id, BrokerId::Robinhood);
    }

    #[test]
    fn selector_parse() {
        assert_eq!(BrokerSelector::parse("Any"), BrokerSelector::Auto);
        assert_eq!(BrokerSelector::parse("auto"), BrokerSelector::Auto);
        assert_eq!(BrokerSelector::parse(""), BrokerSelector::Auto);
        assert_eq!(
            BrokerSelector::parse("IBKR"),
            BrokerSelector::Named(BrokerId::InteractiveBrokers)
        );
        assert_eq!(
            BrokerSelector::parse("robinhood"),
            BrokerSelector::Named(BrokerId::Robinhood)
        );
        assert_eq!(
            BrokerSelector::parse("etrade"),
            BrokerSelector::Named(BrokerId::Generic),
            "unknown broker falls back to generic"
        );
    }

    #[test]
    fn detection_order_ends_with_generic() {
        assert_eq!(BrokerId::DETECTION_ORDER.last(), Some(&BrokerId::Generic));
        assert!(GENERIC.detect(&[]));
    }

    #[test]
    fn resolve_columns_reports_first_present_synonym() {
        let h = header(&["Ticker", "Action", "Shares", "Cost", "Timestamp"]);
        let cols = GENERIC.resolve_columns(&h);
        let found: Vec<_> = cols.iter().map(|(_, c)| c.as_deref()).collect();
        assert_eq!(
            found,
            [Some("Ticker"), Some("Action"), Some("Shares"), Some("Cost"), Some("Timestamp")]
        );

        let cols = GENERIC.resolve_columns(&header(&["symbol"]));
        assert_eq!(cols[0].1.as_deref(), Some("symbol"));
        assert!(cols[1..].iter().all(|(_, c)| c.is_none()));
    }
}
