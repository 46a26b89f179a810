//! Replay ordering policy.
//!
//! Trades are replayed in ascending trade-date order. The sort is **stable**:
//! trades sharing a date keep the order in which they were accumulated, so a
//! same-day buy listed before a same-day sell is applied first.
//!
//! # Sort key
//!
//! `parse_trade_date(date)` ascending, with undated (unparseable) trades after
//! every dated one. Ties are never broken by any other field.

use std::cmp::Ordering;

use crate::dates::parse_trade_date;
use crate::types::CanonicalTrade;

/// Sort `trades` into replay order **in place**.
///
/// Pure and deterministic: identical inputs always produce identical outputs.
pub fn sort_trades_chronological(trades: &mut Vec<CanonicalTrade>) {
    // Parse each date once; `sort_by` on the keyed pairs is stable.
    let mut keyed: Vec<_> = trades
        .drain(..)
        .map(|t| (parse_trade_date(&t.date), t))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    trades.extend(keyed.into_iter().map(|(_, t)| t));
}
