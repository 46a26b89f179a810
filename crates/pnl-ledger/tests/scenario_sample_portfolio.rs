//! Scenario: the three-symbol sample portfolio.
//!
//! Buys and sells for AAPL, MSFT and TSLA, each closed out in full at a gain.
//!
//! # Invariants under test
//!
//! 1. Each sell realizes `(sell - buy) * qty`.
//! 2. Totals: profit 316.50, loss 0, net 316.50.
//! 3. Symbol summary ordered by profit descending, two trades each.
//! 4. Output trades are in date order regardless of input order.

use pnl_ledger::{calculate_profit_loss, CanonicalTrade, Side};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn sample_in_chronological_order() -> Vec<CanonicalTrade> {
    vec![
        CanonicalTrade::buy("AAPL", 10.0, 150.25, "2023-01-01"),
        CanonicalTrade::sell("AAPL", 10.0, 165.50, "2023-01-02"),
        CanonicalTrade::buy("MSFT", 5.0, 280.10, "2023-01-03"),
        CanonicalTrade::sell("MSFT", 5.0, 300.75, "2023-01-04"),
        CanonicalTrade::buy("TSLA", 3.0, 190.25, "2023-01-05"),
        CanonicalTrade::sell("TSLA", 3.0, 210.50, "2023-01-06"),
    ]
}

fn realized_for(trades: &[CanonicalTrade], symbol: &str) -> f64 {
    trades
        .iter()
        .find(|t| t.symbol == symbol && t.side == Side::Sell)
        .and_then(|t| t.realized_pnl)
        .expect("sell must carry realized pnl")
}

#[test]
fn per_trade_realized_pnl() {
    let r = calculate_profit_loss(&sample_in_chronological_order());

    assert!(approx(realized_for(&r.trades, "AAPL"), 152.50));
    assert!(approx(realized_for(&r.trades, "MSFT"), 103.25));
    assert!(approx(realized_for(&r.trades, "TSLA"), 60.75));

    // buys never realize
    assert!(r
        .trades
        .iter()
        .filter(|t| t.side == Side::Buy)
        .all(|t| t.realized_pnl.is_none()));
}

#[test]
fn portfolio_totals() {
    let r = calculate_profit_loss(&sample_in_chronological_order());

    assert!(approx(r.total_profit, 316.50), "total_profit={}", r.total_profit);
    assert_eq!(r.total_loss, 0.0);
    assert!(approx(r.net_pnl, 316.50));
    assert_eq!(r.net_pnl, r.total_profit + r.total_loss);
}

#[test]
fn symbol_summary_sorted_by_profit() {
    let r = calculate_profit_loss(&sample_in_chronological_order());

    let syms: Vec<_> = r.symbol_summary.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(syms, ["AAPL", "MSFT", "TSLA"]);
    assert!(r.symbol_summary.iter().all(|s| s.trade_count == 2));
    assert!(approx(r.symbol_summary[0].profit_loss, 152.50));
    assert!(approx(r.symbol_summary[1].profit_loss, 103.25));
    assert!(approx(r.symbol_summary[2].profit_loss, 60.75));
}

#[test]
fn help_page_sample_dates_give_same_pnl() {
    // Same trades with the interleaved dates from the CSV help sample.
    let trades = vec![
        CanonicalTrade::buy("AAPL", 10.0, 150.25, "2023-01-15"),
        CanonicalTrade::sell("AAPL", 10.0, 165.50, "2023-02-20"),
        CanonicalTrade::buy("MSFT", 5.0, 280.10, "2023-01-10"),
        CanonicalTrade::sell("MSFT", 5.0, 300.75, "2023-03-05"),
        CanonicalTrade::buy("TSLA", 3.0, 190.25, "2023-02-01"),
        CanonicalTrade::sell("TSLA", 3.0, 210.50, "2023-04-10"),
    ];
    let r = calculate_profit_loss(&trades);

    let dates: Vec<_> = r.trades.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(
        dates,
        ["2023-01-10", "2023-01-15", "2023-02-01", "2023-02-20", "2023-03-05", "2023-04-10"]
    );
    assert!(approx(r.net_pnl, 316.50));
    let syms: Vec<_> = r.symbol_summary.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(syms, ["AAPL", "MSFT", "TSLA"]);
}
