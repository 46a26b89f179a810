//! Row parser: delimited text → header + ordered key/value records.
//!
//! This is the **read** side only. It does not pick a broker profile, map
//! fields, or drop malformed trades; it just turns text into records keyed by
//! the header row.
//!
//! ## Contract
//!
//! - The first line with any non-empty field is the header.
//! - Blank lines anywhere (including trailing) are skipped.
//! - Every field and header name is whitespace-trimmed.
//! - RFC 4180 quoting is honored (`"Apple, Inc."` stays one field).
//! - Short rows are padded with empty values; extra trailing fields are
//!   ignored.
//! - No data rows after the header → [`IngestError::EmptyInput`].

use csv::{ReaderBuilder, Trim};

use crate::error::IngestError;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One data row as `(header, raw value)` pairs in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    fn from_row(header: &[String], row: &csv::StringRecord) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), row.get(i).unwrap_or("").to_string()))
            .collect();
        Self { fields }
    }

    /// Raw value for a column name (case-insensitive). First match wins when a
    /// header repeats a name.
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = column.trim();
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(column))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parser output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRows {
    pub header: Vec<String>,
    pub records: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse comma-delimited `text` from the source named `source`.
///
/// `source` is only used in error messages.
pub fn parse_rows(source: &str, text: &str) -> Result<ParsedRows, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for (i, row) in reader.records().enumerate() {
        let row = row.map_err(|e| IngestError::InvalidSourceType {
            source: source.to_string(),
            reason: format!("line {}: {e}", i + 1),
        })?;

        if row.iter().all(str::is_empty) {
            continue;
        }

        match &header {
            None => header = Some(row.iter().map(str::to_string).collect()),
            Some(h) => records.push(RawRecord::from_row(h, &row)),
        }
    }

    match header {
        Some(header) if !records.is_empty() => Ok(ParsedRows { header, records }),
        _ => Err(IngestError::EmptyInput {
            source: source.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
