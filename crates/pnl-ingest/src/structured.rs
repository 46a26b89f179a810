//! Already-structured trade input (JSON).
//!
//! Accepts either a bare array of trades or a request-shaped object
//! `{"trades": [...], "broker": "Any"}`. Trades that fail the canonical
//! invariants are filtered out the same way the field mapper drops rows.

use pnl_ledger::CanonicalTrade;
use serde::Deserialize;

use crate::error::IngestError;
use crate::profile::BrokerSelector;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TradeDocument {
    Bare(Vec<CanonicalTrade>),
    Request {
        trades: Vec<CanonicalTrade>,
        #[serde(default)]
        broker: Option<String>,
    },
}

/// Decoded structured input.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredTrades {
    pub trades: Vec<CanonicalTrade>,
    pub dropped: usize,
    pub broker: BrokerSelector,
}

/// Parse a JSON trade document from the source named `source`.
pub fn parse_trade_document(source: &str, text: &str) -> Result<StructuredTrades, IngestError> {
    if text.trim().is_empty() {
        return Err(IngestError::EmptyInput {
            source: source.to_string(),
        });
    }

    let doc: TradeDocument =
        serde_json::from_str(text).map_err(|e| IngestError::InvalidSourceType {
            source: source.to_string(),
            reason: format!("not a trade document: {e}"),
        })?;

    let (raw, broker) = match doc {
        TradeDocument::Bare(trades) => (trades, BrokerSelector::Auto),
        TradeDocument::Request { trades, broker } => (
            trades,
            broker
                .as_deref()
                .map(BrokerSelector::parse)
                .unwrap_or_default(),
        ),
    };

    let total = raw.len();
    let trades: Vec<CanonicalTrade> = raw.into_iter().filter(|t| t.is_well_formed()).collect();

    Ok(StructuredTrades {
        dropped: total - trades.len(),
        trades,
        broker,
    })
}
