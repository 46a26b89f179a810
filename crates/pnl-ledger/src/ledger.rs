//! Position ledger: replays a trade history under weighted-average cost.
//!
//! # Purpose
//! [`accounting`](crate::accounting) holds the per-trade buy/sell mechanics.
//! This module owns the replay boundary:
//!
//! - Takes a snapshot of the full merged trade history (never mutates it).
//! - Sorts it into replay order (see [`crate::sort_trades_chronological`]).
//! - Builds a **fresh** position map for the replay and hands it back with
//!   the annotated trades; nothing survives between replays.
//!
//! # Usage
//! ```ignore
//! let outcome = Ledger::replay(&accumulator.trades);
//! for t in &outcome.trades {
//!     println!("{} {} {:?}", t.symbol, t.side, t.realized_pnl);
//! }
//! ```
//!
//! # Determinism
//! No IO, no time, no randomness. The same input slice always yields the same
//! annotated sequence and the same final positions.

use tracing::debug;

use crate::accounting::{apply_buy, apply_sell};
use crate::ordering::sort_trades_chronological;
use crate::types::{CanonicalTrade, Position, PositionMap, Side};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one full replay.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerOutcome {
    /// Trades in replay order, each sell annotated with its realized PnL when
    /// it disposed of an open position.
    pub trades: Vec<CanonicalTrade>,
    /// Final per-symbol positions after the last trade.
    pub positions: PositionMap,
}

impl LedgerOutcome {
    /// Final position for a symbol, if the replay ever created one.
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Per-replay position state. Constructed by [`Ledger::replay`] and dropped
/// once the outcome is produced.
#[derive(Debug, Default)]
pub struct Ledger {
    positions: PositionMap,
}

impl Ledger {
    /// Replay the complete trade history.
    ///
    /// Any `realized_pnl` already present on the input (e.g. a re-imported
    /// export) is discarded and recomputed.
    pub fn replay(trades: &[CanonicalTrade]) -> LedgerOutcome {
        let mut ordered: Vec<CanonicalTrade> = trades.to_vec();
        sort_trades_chronological(&mut ordered);

        let mut ledger = Ledger::default();
        for trade in ordered.iter_mut() {
            trade.realized_pnl = ledger.apply(trade);
        }

        debug!(
            trades = ordered.len(),
            symbols = ledger.positions.len(),
            "ledger replay complete"
        );

        LedgerOutcome {
            trades: ordered,
            positions: ledger.positions,
        }
    }

    fn apply(&mut self, trade: &CanonicalTrade) -> Option<f64> {
        match trade.side {
            Side::Buy => {
                apply_buy(&mut self.positions, trade);
                None
            }
            Side::Sell => {
                let realized = apply_sell(&mut self.positions, trade);
                if realized.is_none() {
                    debug!(symbol = %trade.symbol, date = %trade.date, "sell without open position ignored");
                }
                realized
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
