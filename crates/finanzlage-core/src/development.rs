//! Development table: the persisted year-by-year account overview
//!
//! Each run patches the column of the newest balance sheet year and writes
//! the whole table back. Columns are only ever appended, cells of older
//! years are left as they were loaded.

use log::{debug, info, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use finanzlage_parser::{read_records, write_records, CsvDocument};
use finanzlage_utils::{format_locale_plain, parse_locale_number, saturating_sum};

use crate::accounts::{
    counts_toward_total_liabilities, is_asset, is_liability, AccountAliases,
    TOTAL_ASSETS_POSITION, TOTAL_LIABILITIES_POSITION,
};
use crate::classify::classify_balances;
use crate::error::{CoreError, CoreResult};
use crate::types::{BalanceMap, ReportSet};

/// Header of the row label column
pub const POSITION_COLUMN: &str = "Position";

/// True for four digit column keys such as `2024`
pub fn is_year_column(column: &str) -> bool {
    column.len() == 4 && column.chars().all(|c| c.is_ascii_digit())
}

fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // no negative zero in the written table
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

/// One tracked account or computed total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    /// Numeric reading of every non-blank cell, text cells read as `0`
    pub values: BTreeMap<String, Decimal>,
    /// Cell text as written to disk, echoed unchanged unless reconciled
    pub cells: BTreeMap<String, String>,
}

impl Position {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: BTreeMap::new(),
            cells: BTreeMap::new(),
        }
    }

    pub fn value(&self, column: &str) -> Option<Decimal> {
        self.values.get(column).copied()
    }

    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Keep a cell as loaded
    fn load_cell(&mut self, column: &str, text: &str) {
        self.values.insert(column.to_string(), parse_locale_number(text));
        self.cells.insert(column.to_string(), text.to_string());
    }

    /// Store a reconciled value rounded to cents, matching what a re-read table yields
    pub fn set_value(&mut self, column: &str, value: Decimal) {
        let rounded = round_cents(value);
        self.values.insert(column.to_string(), rounded);
        self.cells.insert(column.to_string(), format_locale_plain(rounded));
    }
}

/// The development table with its columns in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentTable {
    /// Every column except `Position`
    pub columns: Vec<String>,
    pub positions: Vec<Position>,
}

impl DevelopmentTable {
    /// Build the table from a parsed CSV file
    pub fn from_document(doc: &CsvDocument) -> CoreResult<Self> {
        if !doc.headers.iter().any(|h| h == POSITION_COLUMN) {
            return Err(CoreError::InvalidFormat {
                message: format!("development table has no '{}' column", POSITION_COLUMN),
            });
        }

        let columns: Vec<String> = doc
            .headers
            .iter()
            .filter(|h| h.as_str() != POSITION_COLUMN)
            .cloned()
            .collect();

        let positions = doc
            .records
            .iter()
            .map(|record| {
                let mut position = Position::new(record.get(POSITION_COLUMN).unwrap_or(""));
                for column in &columns {
                    if let Some(cell) = record.get_non_empty(column) {
                        position.load_cell(column, cell);
                    }
                }
                position
            })
            .collect();

        Ok(Self { columns, positions })
    }

    /// Load the table; a missing file is fatal
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::DevelopmentTableMissing {
                path: path.display().to_string(),
            });
        }
        let doc = read_records(path)?;
        Self::from_document(&doc)
    }

    /// Replace the file with the full table
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let (header, rows) = self.to_rows();
        write_records(path, &header, &rows)?;
        debug!("Wrote {} positions to {}", rows.len(), path.display());
        Ok(())
    }

    /// Header and cell text as written to disk
    pub fn to_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut header = Vec::with_capacity(self.columns.len() + 1);
        header.push(POSITION_COLUMN.to_string());
        header.extend(self.columns.iter().cloned());

        let rows = self
            .positions
            .iter()
            .map(|position| {
                let mut row = Vec::with_capacity(header.len());
                row.push(position.name.clone());
                row.extend(
                    self.columns
                        .iter()
                        .map(|column| position.cell(column).unwrap_or_default().to_string()),
                );
                row
            })
            .collect();

        (header, rows)
    }

    /// Year columns, ascending
    pub fn years(&self) -> Vec<String> {
        let mut years: Vec<String> = self
            .columns
            .iter()
            .filter(|c| is_year_column(c))
            .cloned()
            .collect();
        years.sort();
        years
    }

    /// Append a column unless present; returns whether it was added
    pub fn ensure_column(&mut self, column: &str) -> bool {
        if self.columns.iter().any(|c| c == column) {
            return false;
        }
        self.columns.push(column.to_string());
        true
    }

    pub fn position(&self, name: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.name == name)
    }

    pub fn value(&self, position: &str, column: &str) -> Option<Decimal> {
        self.position(position).and_then(|p| p.value(column))
    }
}

// ==================== Reconciliation ====================

/// What one reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Year that was patched, `None` when there was no balance sheet
    pub year: Option<String>,
    pub column_added: bool,
    pub updated_positions: Vec<String>,
}

/// Patch the column of the newest balance sheet year
pub fn reconcile(
    table: &mut DevelopmentTable,
    balance_reports: &ReportSet,
    aliases: &AccountAliases,
) -> ReconcileOutcome {
    let Some(report) = balance_reports.latest_year().and_then(|y| balance_reports.get(y)) else {
        info!("No balance sheets found, development table left unchanged");
        return ReconcileOutcome::default();
    };

    let balances = classify_balances(&report.rows);
    debug!("Balance sheet {} has {} tracked accounts", report.year, balances.len());
    apply_balances(table, &report.year, &balances, aliases)
}

/// Write one year's balances into the table
pub fn apply_balances(
    table: &mut DevelopmentTable,
    year: &str,
    balances: &BalanceMap,
    aliases: &AccountAliases,
) -> ReconcileOutcome {
    let column_added = table.ensure_column(year);
    let mut updated_positions = Vec::new();

    for position in table.positions.iter_mut() {
        let aliased = aliases
            .account_for(&position.name)
            .and_then(|account| balances.get(account));

        let value = if let Some(balance) = aliased {
            if is_liability(&position.name) {
                -balance.abs()
            } else {
                *balance
            }
        } else if position.name == TOTAL_ASSETS_POSITION {
            saturating_sum(
                balances
                    .iter()
                    .filter(|(name, _)| is_asset(name))
                    .map(|(_, v)| *v),
            )
        } else if position.name == TOTAL_LIABILITIES_POSITION {
            -saturating_sum(
                balances
                    .iter()
                    .filter(|(name, _)| counts_toward_total_liabilities(name))
                    .map(|(_, v)| v.abs()),
            )
        } else {
            continue;
        };

        position.set_value(year, value);
        updated_positions.push(position.name.clone());
    }

    info!(
        "Updated {} positions for {}{}",
        updated_positions.len(),
        year,
        if column_added { " (new column)" } else { "" }
    );

    ReconcileOutcome {
        year: Some(year.to_string()),
        column_added,
        updated_positions,
    }
}

/// Load, reconcile and persist the table at `path`
pub fn reconcile_file(
    path: &Path,
    balance_reports: &ReportSet,
    aliases: &AccountAliases,
) -> CoreResult<(DevelopmentTable, ReconcileOutcome)> {
    let mut table = DevelopmentTable::load(path)?;
    let outcome = reconcile(&mut table, balance_reports, aliases);
    if outcome.year.is_some() {
        table.save(path)?;
    }
    Ok((table, outcome))
}

// ==================== Liability Deltas ====================

/// Year-over-year change of the summed loan balances.
///
/// The first year is `0`. Positive means debt grew, negative means it was
/// paid down. Missing cells count as `0`.
pub fn liability_deltas(
    table: &DevelopmentTable,
    years: &[String],
    aliases: &AccountAliases,
) -> BTreeMap<String, Decimal> {
    let liability_rows = aliases.liability_positions();

    let sums: Vec<Decimal> = years
        .iter()
        .map(|year| {
            saturating_sum(
                liability_rows
                    .iter()
                    .filter_map(|position| table.value(position, year))
                    .map(|v| v.abs()),
            )
        })
        .collect();

    years
        .iter()
        .enumerate()
        .map(|(idx, year)| {
            let delta = if idx == 0 { Decimal::ZERO } else { sums[idx] - sums[idx - 1] };
            (year.clone(), delta)
        })
        .collect()
}

/// Like [`liability_deltas`] but reading the table from disk; failures yield zeros
pub fn load_liability_deltas(
    path: &Path,
    years: &[String],
    aliases: &AccountAliases,
) -> BTreeMap<String, Decimal> {
    match DevelopmentTable::load(path) {
        Ok(table) => liability_deltas(&table, years, aliases),
        Err(e) => {
            warn!("Could not read liability deltas from {}: {}", path.display(), e);
            years.iter().map(|y| (y.clone(), Decimal::ZERO)).collect()
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BalanceSide, LedgerRow, YearlyReport};
    use finanzlage_parser::{parse_records, ReportKind};
    use std::str::FromStr;

    const TABLE: &str = "\u{feff}Position;2022;2023\n\
        Girokonto SKB 001;900,00;1.100,50\n\
        Freizeitkonto SKB 000;;50,00\n\
        Sparkonto SKB 003;5000,00;5200,00\n\
        Darlehenskonto SKB 004;-3000,00;-2500,00\n\
        Privatdarlehen 006;-1000,00;-1000,00\n\
        Summe Aktiva;5900,00;6350,50\n\
        Verbindlichkeiten;-4000,00;-3500,00\n\
        Notiz;;\n";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn table() -> DevelopmentTable {
        DevelopmentTable::from_document(&parse_records(TABLE).unwrap()).unwrap()
    }

    fn balance_set(year: &str, rows: &[(&str, &str, BalanceSide)]) -> ReportSet {
        let mut set = ReportSet::new(ReportKind::BalanceSheet);
        set.insert(YearlyReport {
            year: year.to_string(),
            kind: ReportKind::BalanceSheet,
            rows: rows
                .iter()
                .map(|(name, amount, side)| LedgerRow {
                    name: name.to_string(),
                    amount: dec(amount),
                    side: Some(*side),
                })
                .collect(),
        });
        set
    }

    fn years(ys: &[&str]) -> Vec<String> {
        ys.iter().map(|y| y.to_string()).collect()
    }

    #[test]
    fn test_load_table() {
        let table = table();
        assert_eq!(table.columns, vec!["2022", "2023"]);
        assert_eq!(table.positions.len(), 8);
        assert_eq!(table.value("Girokonto SKB 001", "2023"), Some(dec("1100.5")));
        assert_eq!(table.value("Freizeitkonto SKB 000", "2022"), None);
        assert_eq!(table.years(), vec!["2022", "2023"]);
    }

    #[test]
    fn test_table_without_position_column() {
        let doc = parse_records("Konto;2023\nKasse;1\n").unwrap();
        let err = DevelopmentTable::from_document(&doc).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
    }

    #[test]
    fn test_years_sorted_and_filtered() {
        let doc = parse_records("Position;2024;Bemerkung;2021;24\n").unwrap();
        let table = DevelopmentTable::from_document(&doc).unwrap();
        assert_eq!(table.years(), vec!["2021", "2024"]);
        assert_eq!(table.columns.len(), 4);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = DevelopmentTable::load(&dir.path().join("Entwicklung.csv")).unwrap_err();
        assert!(matches!(err, CoreError::DevelopmentTableMissing { .. }));
    }

    #[test]
    fn test_reconcile_new_year() {
        let doc = parse_records(
            "Position;2023\nGirokonto SKB 001;1000,00\nDarlehenskonto SKB 004;-2500,00\nVerbindlichkeiten;-2500,00\nSumme Aktiva;1000,00\n",
        )
        .unwrap();
        let mut table = DevelopmentTable::from_document(&doc).unwrap();
        let balances = balance_set(
            "2024",
            &[
                ("Girokonto SKB -Konto 700-", "1500.00", BalanceSide::Aktiva),
                ("Darlehenskonto SKB", "-2000.00", BalanceSide::Passiva),
            ],
        );

        let outcome = reconcile(&mut table, &balances, &AccountAliases::default());

        assert_eq!(outcome.year.as_deref(), Some("2024"));
        assert!(outcome.column_added);
        assert_eq!(table.columns, vec!["2023", "2024"]);
        assert_eq!(table.value("Girokonto SKB 001", "2024"), Some(dec("1500")));
        assert_eq!(table.value("Darlehenskonto SKB 004", "2024"), Some(dec("-2000")));
        assert_eq!(table.value("Verbindlichkeiten", "2024"), Some(dec("-2000")));
        assert_eq!(table.value("Summe Aktiva", "2024"), Some(dec("1500")));
        assert_eq!(table.value("Girokonto SKB 001", "2023"), Some(dec("1000")));

        let (_, rows) = table.to_rows();
        assert_eq!(rows[1], vec!["Darlehenskonto SKB 004", "-2500,00", "-2000,00"]);
    }

    #[test]
    fn test_liability_sign_forced_negative() {
        let mut table = table();
        let balances = balance_set(
            "2024",
            &[
                ("Privatdarlehen", "750.00", BalanceSide::Passiva),
                ("Darlehenskonto SKB", "1800.00", BalanceSide::Passiva),
            ],
        );
        reconcile(&mut table, &balances, &AccountAliases::default());
        assert_eq!(table.value("Privatdarlehen 006", "2024"), Some(dec("-750")));
        assert_eq!(table.value("Darlehenskonto SKB 004", "2024"), Some(dec("-1800")));
        // Only capitalised `Darlehen` accounts make up the total
        assert_eq!(table.value("Verbindlichkeiten", "2024"), Some(dec("-1800")));
    }

    #[test]
    fn test_unmatched_positions_untouched() {
        let mut table = table();
        let balances = balance_set(
            "2023",
            &[("Girokonto SKB -Konto 700-", "1234.00", BalanceSide::Aktiva)],
        );
        let outcome = reconcile(&mut table, &balances, &AccountAliases::default());

        assert!(!outcome.column_added);
        assert_eq!(table.value("Girokonto SKB 001", "2023"), Some(dec("1234")));
        // No balance for these accounts in the snapshot
        assert_eq!(table.value("Sparkonto SKB 003", "2023"), Some(dec("5200")));
        assert_eq!(table.value("Notiz", "2023"), None);
        assert!(!outcome.updated_positions.contains(&"Notiz".to_string()));
    }

    #[test]
    fn test_total_assets_uses_markers() {
        let mut table = table();
        let balances = balance_set(
            "2024",
            &[
                ("Girokonto SKB -Konto 700-", "100.10", BalanceSide::Aktiva),
                ("Girokonto SKB-Konto 701-", "20.00", BalanceSide::Aktiva),
                ("Sparkonto SKB -Rücklagenkonto f. Heizung", "3000.00", BalanceSide::Aktiva),
                ("Kasse", "55.00", BalanceSide::Aktiva),
            ],
        );
        reconcile(&mut table, &balances, &AccountAliases::default());
        assert_eq!(table.value("Summe Aktiva", "2024"), Some(dec("3120.10")));
        assert_eq!(table.value("Freizeitkonto SKB 000", "2024"), Some(dec("20")));
        assert_eq!(table.value("Verbindlichkeiten", "2024"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_no_balance_sheets_is_noop() {
        let mut table = table();
        let before = table.clone();
        let outcome = reconcile(&mut table, &ReportSet::new(ReportKind::BalanceSheet), &AccountAliases::default());
        assert_eq!(outcome, ReconcileOutcome::default());
        assert_eq!(table, before);
    }

    #[test]
    fn test_reconcile_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Entwicklung.csv");
        std::fs::write(&path, TABLE).unwrap();
        let balances = balance_set(
            "2024",
            &[
                ("Girokonto SKB -Konto 700-", "1.005", BalanceSide::Aktiva),
                ("Darlehenskonto SKB", "-2000.456", BalanceSide::Passiva),
            ],
        );
        let aliases = AccountAliases::default();

        let (first, _) = reconcile_file(&path, &balances, &aliases).unwrap();
        let first_bytes = std::fs::read(&path).unwrap();
        let (second, _) = reconcile_file(&path, &balances, &aliases).unwrap();
        let second_bytes = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(DevelopmentTable::load(&path).unwrap(), first);
        assert_eq!(first.value("Girokonto SKB 001", "2024"), Some(dec("1.01")));
        assert_eq!(first.value("Darlehenskonto SKB 004", "2024"), Some(dec("-2000.46")));
    }

    #[test]
    fn test_reconcile_file_keeps_blank_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Entwicklung.csv");
        std::fs::write(&path, TABLE).unwrap();
        let balances = balance_set("2024", &[]);

        reconcile_file(&path, &balances, &AccountAliases::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.starts_with("Position;2022;2023;2024\n"));
        assert!(written.contains("Freizeitkonto SKB 000;;50,00;\n"));
        assert!(written.contains("Girokonto SKB 001;900,00;1.100,50;\n"));
        assert!(written.contains("Summe Aktiva;5900,00;6350,50;0,00\n"));
    }

    #[test]
    fn test_reconcile_file_echoes_untouched_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Entwicklung.csv");
        std::fs::write(
            &path,
            "Position;2023;Bemerkung\n\
             Girokonto SKB 001;1000,00;siehe Beleg 12\n\
             Sparkonto SKB 003;5.200,125;\n\
             Notiz;k.A.;\n",
        )
        .unwrap();
        let balances = balance_set(
            "2024",
            &[("Girokonto SKB -Konto 700-", "1500.00", BalanceSide::Aktiva)],
        );

        let (table, _) = reconcile_file(&path, &balances, &AccountAliases::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert_eq!(
            written,
            "Position;2023;Bemerkung;2024\n\
             Girokonto SKB 001;1000,00;siehe Beleg 12;1500,00\n\
             Sparkonto SKB 003;5.200,125;;\n\
             Notiz;k.A.;;\n"
        );
        assert_eq!(table.value("Sparkonto SKB 003", "2023"), Some(dec("5200.125")));
        assert_eq!(table.value("Notiz", "2023"), Some(Decimal::ZERO));
        assert_eq!(table.position("Notiz").unwrap().cell("2023"), Some("k.A."));
    }

    #[test]
    fn test_liability_deltas() {
        let doc = parse_records(
            "Position;2023;2024\nDarlehenskonto SKB 004;-1500,00;-2000,00\nPrivatdarlehen 006;-500,00;-500,00\n",
        )
        .unwrap();
        let table = DevelopmentTable::from_document(&doc).unwrap();
        let deltas = liability_deltas(&table, &years(&["2023", "2024"]), &AccountAliases::default());

        assert_eq!(deltas["2023"], Decimal::ZERO);
        assert_eq!(deltas["2024"], dec("500"));
    }

    #[test]
    fn test_liability_deltas_paid_down_and_missing_cells() {
        let table = table();
        let deltas = liability_deltas(&table, &years(&["2022", "2023", "2025"]), &AccountAliases::default());
        assert_eq!(deltas["2022"], Decimal::ZERO);
        assert_eq!(deltas["2023"], dec("-500"));
        assert_eq!(deltas["2025"], dec("-3500"));
    }

    #[test]
    fn test_load_liability_deltas_failure_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let deltas = load_liability_deltas(
            &dir.path().join("missing.csv"),
            &years(&["2023", "2024"]),
            &AccountAliases::default(),
        );
        assert_eq!(deltas.len(), 2);
        assert!(deltas.values().all(|d| d.is_zero()));
    }
}
