use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::CanonicalTrade;

/// Per-symbol roll-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSummary {
    pub symbol: String,
    /// Every trade for the symbol counts, buys and sells alike.
    pub trade_count: usize,
    /// Sum of non-zero realized PnL for the symbol.
    #[serde(with = "crate::float_json")]
    pub profit_loss: f64,
}

/// Final result handed to export / display collaborators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub trades: Vec<CanonicalTrade>,
    #[serde(with = "crate::float_json")]
    pub total_profit: f64,
    #[serde(with = "crate::float_json")]
    pub total_loss: f64,
    #[serde(rename = "netPnL", with = "crate::float_json")]
    pub net_pnl: f64,
    pub symbol_summary: Vec<SymbolSummary>,
}

impl CalculationResult {
    pub fn realized_count(&self) -> usize {
        self.trades.iter().filter(|t| t.realized_pnl.is_some()).count()
    }
}

/// Aggregate the ledger's annotated trade sequence.
///
/// Totals:
/// - total_profit = Σ realized where realized >= 0
/// - total_loss   = Σ realized where realized < 0 (stays negative)
/// - net_pnl      = total_profit + total_loss
///
/// Symbol summary:
/// - one entry per distinct symbol, in first-appearance order before sorting
/// - trade_count counts every trade
/// - profit_loss only adds realized values that are non-zero; a breakeven sell
///   is counted but contributes nothing
/// - sorted descending by profit_loss, ties keep first-appearance order
pub fn summarize(trades: Vec<CanonicalTrade>) -> CalculationResult {
    let mut total_profit = 0.0_f64;
    let mut total_loss = 0.0_f64;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut summary: Vec<SymbolSummary> = Vec::new();

    for t in &trades {
        if let Some(pnl) = t.realized_pnl {
            if pnl >= 0.0 {
                total_profit += pnl;
            } else if pnl < 0.0 {
                total_loss += pnl;
            }
        }

        let slot = *index.entry(t.symbol.as_str()).or_insert_with(|| {
            summary.push(SymbolSummary {
                symbol: t.symbol.clone(),
                trade_count: 0,
                profit_loss: 0.0,
            });
            summary.len() - 1
        });

        let entry = &mut summary[slot];
        entry.trade_count += 1;
        if let Some(pnl) = t.realized_pnl.filter(|v| is_truthy(*v)) {
            entry.profit_loss += pnl;
        }
    }

    summary.sort_by(|a, b| {
        b.profit_loss
            .partial_cmp(&a.profit_loss)
            .unwrap_or(Ordering::Equal)
    });

    CalculationResult {
        trades,
        total_profit,
        total_loss,
        net_pnl: total_profit + total_loss,
        symbol_summary: summary,
    }
}

/// Zero and NaN do not count toward a symbol's profit_loss.
fn is_truthy(v: f64) -> bool {
    v != 0.0 && !v.is_nan()
}
