//! pnl-ledger
//!
//! Weighted-average cost-basis accounting over canonical trades.
//! - Canonical trade record (the accounting atom)
//! - Chronological replay order (stable on equal dates)
//! - Per-symbol position ledger producing realized PnL per disposal
//! - Portfolio totals + per-symbol summary
//! - Pure deterministic logic (no IO, no clock, no globals)

mod accounting;
mod dates;
mod float_json;
mod ordering;
mod summary;
mod types;

pub mod ledger;

pub use accounting::{apply_buy, apply_sell};
pub use dates::{normalize_iso_date, parse_trade_date};
pub use ledger::{Ledger, LedgerOutcome};
pub use ordering::sort_trades_chronological;
pub use summary::{summarize, CalculationResult, SymbolSummary};
pub use types::{CanonicalTrade, Position, PositionMap, Side};

/// Replay `trades` through a fresh [`Ledger`] and aggregate the annotated
/// sequence into a [`CalculationResult`].
///
/// `trades` must be the complete merged history for the session: cost basis
/// depends on every prior buy, so replaying a partial slice gives wrong PnL.
pub fn calculate_profit_loss(trades: &[CanonicalTrade]) -> CalculationResult {
    let outcome = Ledger::replay(trades);
    summarize(outcome.trades)
}
