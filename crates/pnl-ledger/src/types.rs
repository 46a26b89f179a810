use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// BUY or SELL for canonical trades.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized trade, independent of the broker export it came from.
///
/// quantity is always positive.
/// price is per unit and never negative.
/// date is an ISO-comparable string; it is parsed only for replay ordering.
/// `realized_pnl` is written once, by [`crate::Ledger::replay`], and only on
/// sells that dispose of an open position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalTrade {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub price: f64,
    pub date: String,
    #[serde(
        rename = "profitLoss",
        alias = "realizedPnL",
        with = "crate::float_json::option",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub realized_pnl: Option<f64>,
}

impl CanonicalTrade {
    pub fn new<S: Into<String>, D: Into<String>>(
        symbol: S,
        side: Side,
        quantity: f64,
        price: f64,
        date: D,
    ) -> Self {
        let t = Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
            date: date.into(),
            realized_pnl: None,
        };
        debug_assert!(t.is_well_formed(), "CanonicalTrade invariants violated: {t:?}");
        t
    }

    /// Shorthand for a buy.
    pub fn buy<S: Into<String>, D: Into<String>>(symbol: S, quantity: f64, price: f64, date: D) -> Self {
        Self::new(symbol, Side::Buy, quantity, price, date)
    }

    /// Shorthand for a sell.
    pub fn sell<S: Into<String>, D: Into<String>>(symbol: S, quantity: f64, price: f64, date: D) -> Self {
        Self::new(symbol, Side::Sell, quantity, price, date)
    }

    /// Whether this record satisfies the canonical invariants:
    /// non-empty symbol, finite quantity > 0, finite price >= 0, non-empty date.
    ///
    /// Structured records handed in by programmatic callers bypass the field
    /// mapper, so the ingest layer filters them through this check.
    pub fn is_well_formed(&self) -> bool {
        !self.symbol.trim().is_empty()
            && self.quantity.is_finite()
            && self.quantity > 0.0
            && self.price.is_finite()
            && self.price >= 0.0
            && !self.date.trim().is_empty()
    }
}

/// Open position for one symbol under weighted-average cost.
///
/// `average_cost` is only meaningful while `quantity > 0`. It is left as-is
/// when a sell takes the quantity to zero or below.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub quantity: f64,
    pub average_cost: f64,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.quantity > 0.0
    }
}

/// Position map keyed by symbol (deterministic iteration).
pub type PositionMap = BTreeMap<String, Position>;
