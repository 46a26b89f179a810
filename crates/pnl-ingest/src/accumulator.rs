//! Trade accumulator: the caller-held running trade set.
//!
//! One accumulator spans one session. Each ingested source is folded in with
//! [`Accumulator::accumulate`], which **consumes** the previous value and
//! returns the next one: the caller threads it from call to call, and the
//! engine holds nothing between calls.
//!
//! Appending never sorts or dedupes. Replay ordering is the ledger's job and
//! only happens once, over the complete merged set.

use std::collections::BTreeSet;

use pnl_ledger::{parse_trade_date, CanonicalTrade};
use serde::{Deserialize, Serialize};

use crate::profile::BrokerId;

/// Earliest and latest parseable trade dates seen so far (raw strings).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accumulator {
    /// Trades in accumulation order (source order, then row order).
    pub trades: Vec<CanonicalTrade>,
    pub symbols: BTreeSet<String>,
    pub date_range: Option<DateRange>,
    /// Broker profile used for the most recent source, if any.
    pub broker: Option<BrokerId>,
    /// Number of sources folded in.
    pub sources: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `new_trades` after everything accumulated so far.
    pub fn accumulate(mut self, new_trades: Vec<CanonicalTrade>, broker: Option<BrokerId>) -> Self {
        for t in &new_trades {
            self.symbols.insert(t.symbol.clone());
            self.widen_date_range(&t.date);
        }
        self.trades.extend(new_trades);
        if broker.is_some() {
            self.broker = broker;
        }
        self.sources += 1;
        self
    }

    pub fn count(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    fn widen_date_range(&mut self, raw: &str) {
        let Some(dt) = parse_trade_date(raw) else {
            return;
        };
        match &mut self.date_range {
            None => {
                self.date_range = Some(DateRange {
                    first: raw.to_string(),
                    last: raw.to_string(),
                });
            }
            Some(range) => {
                if parse_trade_date(&range.first).map_or(true, |f| dt < f) {
                    range.first = raw.to_string();
                }
                if parse_trade_date(&range.last).map_or(true, |l| dt > l) {
                    range.last = raw.to_string();
                }
            }
        }
    }
}

/// Fold `new_trades` into `existing` (or a fresh accumulator).
pub fn accumulate(
    existing: Option<Accumulator>,
    new_trades: Vec<CanonicalTrade>,
    broker: Option<BrokerId>,
) -> Accumulator {
    existing.unwrap_or_default().accumulate(new_trades, broker)
}
