//! Scenario: two exports from different brokers, one session.
//!
//! A generic CSV holds the AAPL buy and an MSFT sell; a Robinhood report holds
//! the AAPL sell and the earlier MSFT buy. Neither file balances on its own.
//!
//! # Invariants under test
//!
//! 1. Sources are appended in selection order, rows in file order.
//! 2. The ledger replay runs once over the merged set, sorted by date, so a
//!    buy in the second file still opens the position a sell in the first
//!    file closes.
//! 3. Accumulator metadata (symbols, date range, last broker, source count)
//!    reflects both sources.

use pnl_ingest::{
    calculate, ingest_source, Accumulator, BrokerId, IngestOptions, RawSource,
};
use pnl_ledger::Side;

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

const GENERIC_CSV: &str = "\
symbol,side,quantity,price,date
AAPL,buy,10,150.00,2023-01-15
MSFT,sell,5,300.00,2023-01-20
";

const ROBINHOOD_CSV: &str = "\
Activity Date,Process Date,Settle Date,Instrument,Description,Trans Code,Quantity,Price,Amount
2/20/2023,2/20/2023,2/22/2023,AAPL,Apple,Sell,10,$165.00,\"$1,650.00\"
1/10/2023,1/10/2023,1/12/2023,MSFT,Microsoft,Buy,5,$280.00,($1400.00)
";

fn session() -> Accumulator {
    let opts = IngestOptions::default();
    let (acc, first) =
        ingest_source(Accumulator::new(), &RawSource::from_text("mine.csv", GENERIC_CSV), &opts)
            .expect("generic source");
    assert_eq!(first.broker, Some(BrokerId::Generic));

    let (acc, second) = ingest_source(
        acc,
        &RawSource::from_text("robinhood.csv", ROBINHOOD_CSV),
        &opts,
    )
    .expect("robinhood source");
    assert_eq!(second.broker, Some(BrokerId::Robinhood));
    assert_eq!(second.rows_kept, 2);
    acc
}

#[test]
fn accumulation_preserves_source_then_row_order() {
    let acc = session();
    let order: Vec<_> = acc
        .trades
        .iter()
        .map(|t| (t.symbol.as_str(), t.side, t.date.as_str()))
        .collect();
    assert_eq!(
        order,
        [
            ("AAPL", Side::Buy, "2023-01-15"),
            ("MSFT", Side::Sell, "2023-01-20"),
            ("AAPL", Side::Sell, "2023-02-20"),
            ("MSFT", Side::Buy, "2023-01-10"),
        ]
    );
}

#[test]
fn accumulator_metadata_spans_sources() {
    let acc = session();
    assert_eq!(acc.sources, 2);
    assert_eq!(acc.count(), 4);
    assert_eq!(acc.broker, Some(BrokerId::Robinhood));
    assert_eq!(
        acc.symbols.iter().map(String::as_str).collect::<Vec<_>>(),
        ["AAPL", "MSFT"]
    );
    let range = acc.date_range.as_ref().expect("dates parse");
    assert_eq!(range.first, "2023-01-10");
    assert_eq!(range.last, "2023-02-20");
}

#[test]
fn single_replay_over_merged_set() {
    let r = calculate(&session()).expect("trades present");

    let dates: Vec<_> = r.trades.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, ["2023-01-10", "2023-01-15", "2023-01-20", "2023-02-20"]);

    // MSFT sell in file 1 closes the buy from file 2: (300 - 280) * 5
    let msft_sell = r
        .trades
        .iter()
        .find(|t| t.symbol == "MSFT" && t.side == Side::Sell)
        .and_then(|t| t.realized_pnl)
        .expect("msft sell realized");
    assert!(approx(msft_sell, 100.0));

    // AAPL: (165 - 150) * 10
    assert!(approx(r.total_profit, 250.0), "total_profit={}", r.total_profit);
    assert_eq!(r.total_loss, 0.0);
    assert_eq!(r.net_pnl, r.total_profit + r.total_loss);

    let summary: Vec<_> = r
        .symbol_summary
        .iter()
        .map(|s| (s.symbol.as_str(), s.trade_count))
        .collect();
    assert_eq!(summary, [("AAPL", 2), ("MSFT", 2)]);
}

#[test]
fn calculating_each_source_alone_loses_the_cross_file_match() {
    let opts = IngestOptions::default();
    let (acc, _) = ingest_source(
        Accumulator::new(),
        &RawSource::from_text("mine.csv", GENERIC_CSV),
        &opts,
    )
    .expect("generic source");
    let r = calculate(&acc).expect("trades present");

    // the MSFT sell has no open position in this file alone
    assert_eq!(r.realized_count(), 0);
    assert_eq!(r.net_pnl, 0.0);
}
