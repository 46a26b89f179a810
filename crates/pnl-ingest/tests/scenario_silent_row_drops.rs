//! Scenario: malformed rows are dropped, never reported as errors.
//!
//! # Invariants under test
//!
//! 1. Rows with an empty symbol, non-numeric or non-positive quantity,
//!    non-numeric or negative price, or an empty date are excluded.
//! 2. Excluded rows only show up in `rows_dropped`; ingestion still succeeds.
//! 3. Side values that are not a buy token (including blank) become sells.
//! 4. A synonym column with a blank value falls through to the next synonym.
//! 5. Robinhood option and cash codes are dropped, never booked as stock
//!    sells against the underlying.

use pnl_ingest::{calculate, ingest_text, read_text, Accumulator, BrokerId, BrokerSelector};
use pnl_ledger::Side;

const MIXED: &str = "\
symbol,side,quantity,price,date
AAPL,buy,10,150.25,2023-01-15
,buy,1,1,2023-01-16
MSFT,buy,ten,280.10,2023-01-17
MSFT,buy,5,n/a,2023-01-18
TSLA,buy,3,190.25,
TSLA,buy,0,190.25,2023-01-19
TSLA,buy,-3,190.25,2023-01-20
TSLA,buy,3,-1,2023-01-21
TSLA,buy,3,NaN,2023-01-22
AAPL,,10,165.50,2023-02-20
AAPL,hold,1,170,2023-02-21
";

#[test]
fn malformed_rows_excluded_and_counted() {
    let batch = read_text("mixed.csv", MIXED, BrokerSelector::Auto).expect("no hard error");
    assert_eq!(batch.report.rows_read, 11);
    assert_eq!(batch.report.rows_kept, 3);
    assert_eq!(batch.report.rows_dropped, 8);
    assert_eq!(
        batch.report.rows_kept + batch.report.rows_dropped,
        batch.report.rows_read
    );
}

#[test]
fn kept_rows_satisfy_canonical_invariants() {
    let batch = read_text("mixed.csv", MIXED, BrokerSelector::Auto).expect("no hard error");
    for t in &batch.trades {
        assert!(t.is_well_formed(), "{t:?}");
        assert!(t.quantity > 0.0);
        assert!(t.price >= 0.0);
    }
}

#[test]
fn blank_and_unknown_sides_are_sells() {
    let batch = read_text("mixed.csv", MIXED, BrokerSelector::Auto).expect("no hard error");
    let sides: Vec<_> = batch.trades.iter().map(|t| t.side).collect();
    assert_eq!(sides, [Side::Buy, Side::Sell, Side::Sell]);
}

#[test]
fn blank_synonym_falls_through() {
    let text = "symbol,ticker,side,quantity,amount,price,date\n,AAPL,buy,,4,10,2023-01-01\n";
    let batch = read_text("syn.csv", text, BrokerSelector::Auto).expect("parses");
    assert_eq!(batch.trades.len(), 1);
    assert_eq!(batch.trades[0].symbol, "AAPL");
    assert_eq!(batch.trades[0].quantity, 4.0);
}

const ROBINHOOD_WITH_OPTIONS: &str = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
1/10/2023,1/10/2023,1/12/2023,AAPL,Apple,Buy,10,$150.00,($1500.00)
1/20/2023,1/20/2023,1/21/2023,AAPL,AAPL 2/17/2023 Call $160.00,BTO,1,$2.10,($210.00)
2/01/2023,2/01/2023,2/02/2023,AAPL,AAPL 2/17/2023 Call $160.00,STC,1,$4.20,$420.00
2/15/2023,2/15/2023,2/15/2023,AAPL,Cash Div: R/D 2023-02-13,CDIV,,,$2.30
2/20/2023,2/20/2023,2/22/2023,AAPL,Apple,Sell,10,$165.00,\"$1,650.00\"
";

#[test]
fn robinhood_option_and_cash_rows_dropped() {
    let (acc, report) = ingest_text(
        Accumulator::new(),
        "rh.csv",
        ROBINHOOD_WITH_OPTIONS,
        BrokerSelector::Auto,
    )
    .expect("parses");
    assert_eq!(report.broker, Some(BrokerId::Robinhood));
    assert_eq!(report.rows_kept, 2);
    assert_eq!(report.rows_dropped, 3);

    let r = calculate(&acc).expect("trades");
    assert_eq!(r.realized_count(), 1, "only the stock sell realizes");
    assert!((r.net_pnl - 150.0).abs() < 1e-9, "net={}", r.net_pnl);
}
