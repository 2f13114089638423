//! Common types for CSV ingestion

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column holding the line item or account name
pub const NAME_COLUMN: &str = "Name";

/// Column holding the signed amount
pub const AMOUNT_COLUMN: &str = "Summe";

/// Column holding the balance sheet side (`Aktiva` / `Passiva`)
pub const SIDE_COLUMN: &str = "Seite der Bilanz";

/// One CSV line keyed by header name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record(HashMap<String, String>);

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Get a field only when it holds more than whitespace
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.0.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A parsed CSV file: header row in file order plus keyed records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CsvDocument {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Yearly export families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Gewinn- und Verlustrechnung
    ProfitLoss,
    /// Bilanz
    BalanceSheet,
}

impl ReportKind {
    pub fn as_str(&self) -> &str {
        match self {
            ReportKind::ProfitLoss => "profit_loss",
            ReportKind::BalanceSheet => "balance_sheet",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
