//! Reading semicolon separated exports and locating yearly report files

use crate::error::ParseError;
use crate::types::{CsvDocument, Record};
use csv::ReaderBuilder;
use log::debug;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Field delimiter of every export handled here
pub const DELIMITER: u8 = b';';

/// Remove a leading UTF-8 byte order mark
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

/// Parse CSV text into a document keyed by the header row
pub fn parse_records(content: &str) -> Result<CsvDocument, ParseError> {
    parse_with_location(content, "<memory>")
}

/// Read and parse a CSV file
pub fn read_records(path: &Path) -> Result<CsvDocument, ParseError> {
    if !path.is_file() {
        return Err(ParseError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    parse_with_location(&content, &path.to_string_lossy())
}

fn parse_with_location(content: &str, location: &str) -> Result<CsvDocument, ParseError> {
    let csv_error = |e: csv::Error| ParseError::Csv {
        location: location.to_string(),
        message: e.to_string(),
    };

    let mut rdr = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(b'"')
        .double_quote(true)
        .flexible(true)
        .has_headers(true)
        .from_reader(strip_bom(content).as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(csv_error)?;
        if row.iter().all(|field| field.is_empty()) {
            continue;
        }

        // Short rows leave the trailing columns absent, extra cells are dropped
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    debug!("Parsed {} records from {}", records.len(), location);

    Ok(CsvDocument { headers, records })
}

// ==================== Report Discovery ====================

/// Find `<prefix>_<YYYY>.csv` files in `dir`, keyed by year
pub fn discover_reports(dir: &Path, prefix: &str) -> Result<BTreeMap<String, PathBuf>, ParseError> {
    if !dir.is_dir() {
        return Err(ParseError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    static YEAR_SUFFIX: OnceCell<Regex> = OnceCell::new();
    let year_regex = YEAR_SUFFIX.get_or_init(|| Regex::new(r"^_(\d{4})\.csv$").unwrap());

    let pattern = format!(
        "{}/{}_*.csv",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(prefix)
    );
    let entries = glob::glob(&pattern).map_err(|e| ParseError::InvalidPattern {
        message: e.to_string(),
    })?;

    let mut reports = BTreeMap::new();
    for entry in entries.flatten() {
        if !entry.is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let year = file_name
            .strip_prefix(prefix)
            .and_then(|rest| year_regex.captures(rest))
            .map(|caps| caps[1].to_string());

        match year {
            Some(year) => {
                reports.insert(year, entry);
            }
            None => debug!("Ignoring {}, no year in file name", file_name),
        }
    }

    Ok(reports)
}

// ==================== Tests ====================
