//! CSV ingestion for German accounting exports
//!
//! Reads the semicolon separated profit/loss and balance sheet exports, finds
//! the yearly files in the data directory and writes tables back.

use std::path::Path;
use std::sync::Arc;

pub mod error;
pub mod types;
pub mod reader;
pub mod writer;

pub use error::ParseError;
pub use types::{CsvDocument, Record, ReportKind, AMOUNT_COLUMN, NAME_COLUMN, SIDE_COLUMN};
pub use reader::{discover_reports, parse_records, read_records, strip_bom};
pub use writer::{records_to_string, write_records};

// ==================== Reader Trait ====================

/// Reader reference type
pub type ReaderRef = Arc<dyn ReportReader>;

/// Source of parsed report files
pub trait ReportReader: Send + Sync {
    /// Read one report file
    fn read(&self, path: &Path) -> Result<CsvDocument, ParseError>;
}

/// Reads reports from the filesystem
#[derive(Debug, Default)]
pub struct CsvReportReader;

impl ReportReader for CsvReportReader {
    fn read(&self, path: &Path) -> Result<CsvDocument, ParseError> {
        read_records(path)
    }
}
