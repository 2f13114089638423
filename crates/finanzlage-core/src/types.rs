//! Core types for ledger rows and yearly reports

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use finanzlage_parser::{Record, ReportKind, AMOUNT_COLUMN, NAME_COLUMN, SIDE_COLUMN};
use finanzlage_utils::parse_locale_number;

/// Category name to summed amount for one year
pub type CategoryMap = BTreeMap<String, Decimal>;

/// Trimmed account name to balance for one balance sheet
pub type BalanceMap = BTreeMap<String, Decimal>;

/// Side of the balance sheet a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    Aktiva,
    Passiva,
}

impl BalanceSide {
    pub fn as_str(&self) -> &str {
        match self {
            BalanceSide::Aktiva => "Aktiva",
            BalanceSide::Passiva => "Passiva",
        }
    }
}

impl std::str::FromStr for BalanceSide {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Aktiva" => Ok(BalanceSide::Aktiva),
            "Passiva" => Ok(BalanceSide::Passiva),
            _ => Err(()),
        }
    }
}

/// One line item of a yearly export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub name: String,
    /// Positive for income, negative for expenses
    pub amount: Decimal,
    pub side: Option<BalanceSide>,
}

impl LedgerRow {
    /// Build a row from a CSV record; `None` unless `Name` and `Summe` are filled
    pub fn from_record(record: &Record) -> Option<Self> {
        let name = record.get_non_empty(NAME_COLUMN)?;
        let amount = record.get_non_empty(AMOUNT_COLUMN)?;

        Some(Self {
            name: name.to_string(),
            amount: parse_locale_number(amount),
            side: record.get(SIDE_COLUMN).and_then(|s| s.parse().ok()),
        })
    }
}

/// All rows of one export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyReport {
    pub year: String,
    pub kind: ReportKind,
    pub rows: Vec<LedgerRow>,
}

impl YearlyReport {
    pub fn from_records(year: &str, kind: ReportKind, records: &[Record]) -> Self {
        Self {
            year: year.to_string(),
            kind,
            rows: records.iter().filter_map(LedgerRow::from_record).collect(),
        }
    }
}

/// Yearly reports of one kind, keyed by year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSet {
    pub kind: ReportKind,
    pub reports: BTreeMap<String, YearlyReport>,
}

impl ReportSet {
    pub fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            reports: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, report: YearlyReport) {
        self.reports.insert(report.year.clone(), report);
    }

    pub fn get(&self, year: &str) -> Option<&YearlyReport> {
        self.reports.get(year)
    }

    /// Years in ascending order
    pub fn years(&self) -> Vec<String> {
        self.reports.keys().cloned().collect()
    }

    pub fn latest_year(&self) -> Option<&str> {
        self.reports.keys().next_back().map(|y| y.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
