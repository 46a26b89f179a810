//! Result export: flat delimited text and JSON.
//!
//! CSV layout is fixed:
//!
//! ```text
//! symbol,side,quantity,price,date,profit_loss
//! AAPL,buy,10.0,150.25,2023-01-15,
//! AAPL,sell,10.0,165.5,2023-02-20,152.5
//! ```
//!
//! `profit_loss` is empty for trades the ledger left unrealized, so reading
//! the file back restores the same `Option` it was written from.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};
use pnl_ledger::{CalculationResult, CanonicalTrade, Side};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub const CSV_HEADER: [&str; 6] = ["symbol", "side", "quantity", "price", "date", "profit_loss"];

#[derive(Debug, Serialize, Deserialize)]
struct TradeRow {
    symbol: String,
    side: String,
    quantity: f64,
    price: f64,
    date: String,
    profit_loss: Option<f64>,
}

impl From<&CanonicalTrade> for TradeRow {
    fn from(t: &CanonicalTrade) -> Self {
        Self {
            symbol: t.symbol.clone(),
            side: t.side.as_str().to_string(),
            quantity: t.quantity,
            price: t.price,
            date: t.date.clone(),
            profit_loss: t.realized_pnl,
        }
    }
}

impl TradeRow {
    fn into_trade(self, row: usize) -> Result<CanonicalTrade, ExportError> {
        let side = match self.side.as_str() {
            "buy" => Side::Buy,
            "sell" => Side::Sell,
            other => {
                return Err(ExportError::InvalidRecord {
                    row,
                    reason: format!("side '{other}' is neither buy nor sell"),
                })
            }
        };
        let trade = CanonicalTrade {
            symbol: self.symbol,
            side,
            quantity: self.quantity,
            price: self.price,
            date: self.date,
            realized_pnl: self.profit_loss,
        };
        if !trade.is_well_formed() {
            return Err(ExportError::InvalidRecord {
                row,
                reason: "trade violates canonical invariants".to_string(),
            });
        }
        Ok(trade)
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the annotated trade sequence as CSV.
pub fn write_trades_csv<W: Write>(writer: W, trades: &[CanonicalTrade]) -> Result<(), ExportError> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    for t in trades {
        w.serialize(TradeRow::from(t))?;
    }
    // serialize() emits the header lazily; an empty sequence still gets one
    if trades.is_empty() {
        w.write_record(CSV_HEADER)?;
    }
    w.flush().map_err(|e| ExportError::Csv(e.to_string()))?;
    Ok(())
}

pub fn trades_to_csv_string(trades: &[CanonicalTrade]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_trades_csv(&mut buf, trades)?;
    String::from_utf8(buf).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Read trades previously written by [`write_trades_csv`].
pub fn read_trades_csv<R: Read>(reader: R) -> Result<Vec<CanonicalTrade>, ExportError> {
    let mut r = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = r.headers()?.clone();
    if header.iter().ne(CSV_HEADER.iter().copied()) {
        return Err(ExportError::InvalidRecord {
            row: 0,
            reason: format!("unexpected header '{}'", header.iter().collect::<Vec<_>>().join(",")),
        });
    }

    let mut trades = Vec::new();
    for (i, row) in r.deserialize::<TradeRow>().enumerate() {
        trades.push(row?.into_trade(i + 1)?);
    }
    Ok(trades)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

pub fn to_json_pretty(result: &CalculationResult) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn from_json(text: &str) -> Result<CalculationResult, ExportError> {
    Ok(serde_json::from_str(text)?)
}
