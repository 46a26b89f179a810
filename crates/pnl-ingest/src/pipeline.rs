//! Ingest pipeline: source → rows → profile → canonical trades → accumulator,
//! then one ledger replay over everything accumulated.
//!
//! Per source:
//! 1. admission (`RawSource::decode_with`): extension + UTF-8
//! 2. row parse (`parse_rows`)
//! 3. profile selection (`select_profile`)
//! 4. field mapping (`map_records`); bad rows are dropped and counted
//! 5. append to the caller's accumulator
//!
//! `calculate` is the only step that touches the ledger.

use pnl_ledger::{calculate_profit_loss, CalculationResult};
use serde::Serialize;
use tracing::{debug, info};

use crate::accumulator::Accumulator;
use crate::error::IngestError;
use crate::mapper::map_records;
use crate::profile::{select_profile, BrokerId, BrokerSelector, CanonicalField};
use crate::rows::parse_rows;
use crate::source::{RawSource, DEFAULT_ALLOWED_EXTENSIONS};
use crate::structured::parse_trade_document;

// ---------------------------------------------------------------------------
// Options / reports
// ---------------------------------------------------------------------------

/// Knobs shared by every source in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    pub selector: BrokerSelector,
    pub allowed_extensions: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            selector: BrokerSelector::Auto,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl IngestOptions {
    pub fn with_selector(selector: BrokerSelector) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }
}

/// Outcome of ingesting one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub source: String,
    /// Profile used; `None` for structured input that named no broker.
    pub broker: Option<BrokerId>,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
}

/// Trades read from one source, not yet accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBatch {
    pub trades: Vec<pnl_ledger::CanonicalTrade>,
    pub report: SourceReport,
}

/// Which raw column a canonical field resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMatch {
    pub field: &'static str,
    pub column: Option<String>,
}

/// Result of format detection on one source (no mapping performed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub source: String,
    pub broker: BrokerId,
    pub broker_name: &'static str,
    pub header: Vec<String>,
    pub matched_columns: Vec<ColumnMatch>,
}

// ---------------------------------------------------------------------------
// Delimited sources
// ---------------------------------------------------------------------------

/// Read and map one delimited source without touching any accumulator.
pub fn read_source(source: &RawSource, options: &IngestOptions) -> Result<SourceBatch, IngestError> {
    let text = source.decode_with(&options.allowed_extensions)?;
    read_text(&source.name, &text, options.selector)
}

/// Same as [`read_source`] for text that is already decoded.
pub fn read_text(name: &str, text: &str, selector: BrokerSelector) -> Result<SourceBatch, IngestError> {
    let parsed = parse_rows(name, text)?;
    let profile = select_profile(selector, &parsed.header);
    debug!(source = %name, %selector, broker = %profile.id, "profile selected");

    let mapped = map_records(profile, &parsed.records);
    let report = SourceReport {
        source: name.to_string(),
        broker: Some(profile.id),
        rows_read: parsed.records.len(),
        rows_kept: mapped.trades.len(),
        rows_dropped: mapped.dropped,
    };
    info!(
        source = %report.source,
        broker = %profile.id,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped,
        "source ingested"
    );

    Ok(SourceBatch {
        trades: mapped.trades,
        report,
    })
}

/// Parse, detect, map and append one source to `acc`.
///
/// On error the passed accumulator is consumed; callers that must survive a
/// bad source should use [`read_source`] and accumulate themselves.
pub fn ingest_source(
    acc: Accumulator,
    source: &RawSource,
    options: &IngestOptions,
) -> Result<(Accumulator, SourceReport), IngestError> {
    let batch = read_source(source, options)?;
    Ok(fold(acc, batch))
}

/// [`ingest_source`] for already-decoded text.
pub fn ingest_text(
    acc: Accumulator,
    name: &str,
    text: &str,
    selector: BrokerSelector,
) -> Result<(Accumulator, SourceReport), IngestError> {
    let batch = read_text(name, text, selector)?;
    Ok(fold(acc, batch))
}

// ---------------------------------------------------------------------------
// Structured sources
// ---------------------------------------------------------------------------

/// Read a JSON trade document (array or `{trades, broker}`).
pub fn read_structured(name: &str, text: &str) -> Result<SourceBatch, IngestError> {
    let doc = parse_trade_document(name, text)?;
    let broker = match doc.broker {
        BrokerSelector::Named(id) => Some(id),
        BrokerSelector::Auto => None,
    };
    let report = SourceReport {
        source: name.to_string(),
        broker,
        rows_read: doc.trades.len() + doc.dropped,
        rows_kept: doc.trades.len(),
        rows_dropped: doc.dropped,
    };
    info!(
        source = %report.source,
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        rows_dropped = report.rows_dropped,
        "structured source ingested"
    );
    Ok(SourceBatch {
        trades: doc.trades,
        report,
    })
}

pub fn ingest_structured(
    acc: Accumulator,
    name: &str,
    text: &str,
) -> Result<(Accumulator, SourceReport), IngestError> {
    let batch = read_structured(name, text)?;
    Ok(fold(acc, batch))
}

fn fold(acc: Accumulator, batch: SourceBatch) -> (Accumulator, SourceReport) {
    let acc = acc.accumulate(batch.trades, batch.report.broker);
    (acc, batch.report)
}

// ---------------------------------------------------------------------------
// Calculation / detection
// ---------------------------------------------------------------------------

/// Single full ledger replay + aggregation over the merged trade set.
pub fn calculate(acc: &Accumulator) -> Result<CalculationResult, IngestError> {
    if acc.is_empty() {
        return Err(IngestError::NoTradeDataExtracted);
    }
    let result = calculate_profit_loss(&acc.trades);
    info!(
        trades = result.trades.len(),
        realized = result.realized_count(),
        net_pnl = result.net_pnl,
        "calculation complete"
    );
    Ok(result)
}

/// Report which profile a source would use and how its columns resolve.
pub fn detect_source(
    source: &RawSource,
    options: &IngestOptions,
) -> Result<DetectionReport, IngestError> {
    let text = source.decode_with(&options.allowed_extensions)?;
    let parsed = parse_rows(&source.name, &text)?;
    let profile = select_profile(options.selector, &parsed.header);

    let matched_columns = profile
        .resolve_columns(&parsed.header)
        .into_iter()
        .map(|(field, column): (CanonicalField, Option<String>)| ColumnMatch {
            field: field.as_str(),
            column,
        })
        .collect();

    Ok(DetectionReport {
        source: source.name.clone(),
        broker: profile.id,
        broker_name: profile.name,
        header: parsed.header,
        matched_columns,
    })
}
