//! Plain-text rendering for terminal output.

use std::fmt::Write;

use pnl_ingest::SourceReport;
use pnl_ledger::CalculationResult;

/// Source summary, annotated trades, per-symbol roll-up, then totals as
/// `key=value` lines.
pub fn result_table(result: &CalculationResult, reports: &[SourceReport]) -> String {
    let mut out = String::new();

    for r in reports {
        let broker = r.broker.map(|b| b.as_str()).unwrap_or("structured");
        let _ = writeln!(
            out,
            "source={} broker={} rows_read={} rows_kept={} rows_dropped={}",
            r.source, broker, r.rows_read, r.rows_kept, r.rows_dropped
        );
    }

    let _ = writeln!(out, "trades:");
    let _ = writeln!(
        out,
        "  {:<20} {:<8} {:<4} {:>12} {:>12} {:>12}",
        "date", "symbol", "side", "quantity", "price", "profit_loss"
    );
    for t in &result.trades {
        let pnl = t
            .realized_pnl
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<20} {:<8} {:<4} {:>12} {:>12.2} {:>12}",
            t.date,
            t.symbol,
            t.side.as_str(),
            t.quantity,
            t.price,
            pnl
        );
    }

    let _ = writeln!(out, "symbol_summary:");
    for s in &result.symbol_summary {
        let _ = writeln!(
            out,
            "  {:<8} trades={} profit_loss={:.2}",
            s.symbol, s.trade_count, s.profit_loss
        );
    }

    let _ = writeln!(out, "total_profit={:.2}", result.total_profit);
    let _ = writeln!(out, "total_loss={:.2}", result.total_loss);
    let _ = writeln!(out, "net_pnl={:.2}", result.net_pnl);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_ingest::BrokerId;
    use pnl_ledger::{calculate_profit_loss, CanonicalTrade};

    #[test]
    fn totals_and_sources_rendered() {
        let result = calculate_profit_loss(&[
            CanonicalTrade::buy("AAPL", 10.0, 150.25, "2023-01-15"),
            CanonicalTrade::sell("AAPL", 10.0, 165.50, "2023-02-20"),
        ]);
        let reports = [SourceReport {
            source: "a.csv".into(),
            broker: Some(BrokerId::Generic),
            rows_read: 3,
            rows_kept: 2,
            rows_dropped: 1,
        }];
        let text = result_table(&result, &reports);
        assert!(text.contains("source=a.csv broker=generic rows_read=3 rows_kept=2 rows_dropped=1"));
        assert!(text.contains("AAPL     trades=2 profit_loss=152.50"));
        assert!(text.ends_with("total_profit=152.50\ntotal_loss=0.00\nnet_pnl=152.50\n"));
    }
}
