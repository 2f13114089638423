//! Writing semicolon separated tables

use crate::error::ParseError;
use crate::reader::DELIMITER;
use csv::WriterBuilder;
use std::path::Path;

/// Serialize a header and rows into `;` separated CSV text
pub fn records_to_string<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> Result<String, ParseError> {
    let write_error = |message: String| ParseError::Write {
        location: "<memory>".to_string(),
        message,
    };

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_writer(Vec::new());

    writer
        .write_record(header.iter().map(|h| h.as_ref()))
        .map_err(|e| write_error(e.to_string()))?;
    for row in rows {
        writer.write_record(row).map_err(|e| write_error(e.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| write_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| write_error(e.to_string()))
}

/// Replace the file at `path` with the given table
pub fn write_records<S: AsRef<str>>(path: &Path, header: &[S], rows: &[Vec<String>]) -> Result<(), ParseError> {
    let content = records_to_string(header, rows)?;
    std::fs::write(path, content).map_err(|e| ParseError::Write {
        location: path.display().to_string(),
        message: e.to_string(),
    })
}
