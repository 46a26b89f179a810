//! pnl-ingest
//!
//! Broker export ingestion: raw delimited text (or a JSON trade document) in,
//! canonical trades out, folded into a caller-held [`Accumulator`].
//!
//! This crate does **not** do any accounting; [`calculate`] hands the merged
//! trade set to `pnl-ledger` for the single replay. It also owns result export
//! (CSV / JSON) since both directions share the trade field layout.

mod error;

pub mod accumulator;
pub mod export;
pub mod mapper;
pub mod pipeline;
pub mod profile;
pub mod rows;
pub mod source;
pub mod structured;

pub use accumulator::{accumulate, Accumulator, DateRange};
pub use error::{ExportError, IngestError};
pub use export::{from_json, read_trades_csv, to_json_pretty, trades_to_csv_string, write_trades_csv};
pub use mapper::{map_record, map_records, MappedRows};
pub use pipeline::{
    calculate, detect_source, ingest_source, ingest_structured, ingest_text, read_source,
    read_structured, read_text, ColumnMatch, DetectionReport, IngestOptions, SourceBatch,
    SourceReport,
};
pub use profile::{
    detect_profile, select_profile, BrokerId, BrokerProfile, BrokerSelector, CanonicalField,
};
pub use rows::{parse_rows, ParsedRows, RawRecord};
pub use source::{RawSource, DEFAULT_ALLOWED_EXTENSIONS};
