use std::fmt;

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Hard failures surfaced to the caller.
///
/// Row-level problems (missing symbol, non-numeric quantity/price, missing
/// date) are **not** errors: those rows are dropped by the field mapper and
/// only show up as a `rows_dropped` count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The source had no data rows after the header (or no header at all).
    EmptyInput { source: String },
    /// The source cannot be read as delimited text.
    InvalidSourceType { source: String, reason: String },
    /// Normalization produced zero usable trades across all sources.
    NoTradeDataExtracted,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::EmptyInput { source } => {
                write!(f, "source '{source}' has no data rows after the header")
            }
            IngestError::InvalidSourceType { source, reason } => {
                write!(f, "source '{source}' is not delimited text: {reason}")
            }
            IngestError::NoTradeDataExtracted => {
                write!(f, "no trade data could be extracted from the provided sources")
            }
        }
    }
}

impl std::error::Error for IngestError {}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors produced while writing or reading back exported results.
#[derive(Debug)]
pub enum ExportError {
    /// An I/O or CSV-library error.
    Csv(String),
    /// JSON encode / decode failure.
    Json(String),
    /// A CSV record could not be turned back into a trade.
    InvalidRecord { row: usize, reason: String },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Csv(msg) => write!(f, "csv export error: {msg}"),
            ExportError::Json(msg) => write!(f, "json export error: {msg}"),
            ExportError::InvalidRecord { row, reason } => {
                write!(f, "export row {row}: {reason}")
            }
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Json(e.to_string())
    }
}
