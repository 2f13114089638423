//! One batch run from the data directory to `PresentationData`

use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use finanzlage_config::Config;
use finanzlage_parser::{discover_reports, ReaderRef, ReportKind};

use crate::accounts::{important_positions, AccountAliases};
use crate::classify::{classify_expense, classify_income};
use crate::development::{load_liability_deltas, reconcile_file};
use crate::error::{CoreError, CoreResult};
use crate::ranking::RankedDataset;
use crate::reports::{PieDataset, PresentationData, TrendDataset};
use crate::types::{CategoryMap, ReportSet, YearlyReport};

/// Add the paid-down debt of a year as an expense category.
///
/// Only applies when `delta` is negative, a category name is configured and
/// the year has no expense of that name yet. Returns whether it was added.
pub fn add_debt_service(expenses: &mut CategoryMap, delta: Decimal, category: Option<&str>) -> bool {
    let Some(category) = category else {
        return false;
    };
    if delta >= Decimal::ZERO || expenses.contains_key(category) {
        return false;
    }
    expenses.insert(category.to_string(), delta.abs());
    true
}

/// Aggregation and reconciliation pipeline
pub struct Pipeline {
    config: Config,
    reader: ReaderRef,
    aliases: AccountAliases,
}

impl Pipeline {
    /// Create a pipeline; fails when the configured alias table is invalid
    pub fn new(config: Config, reader: ReaderRef) -> CoreResult<Self> {
        let aliases = AccountAliases::from_config(&config.accounts)?;
        Ok(Self {
            config,
            reader,
            aliases,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage once
    pub fn run(&self) -> CoreResult<PresentationData> {
        let data_dir = &self.config.data.path;
        if !data_dir.is_dir() {
            return Err(CoreError::DataDirectoryNotFound {
                path: data_dir.display().to_string(),
            });
        }
        info!("Reading reports from {}", data_dir.display());

        let profit_loss = self.load_reports(ReportKind::ProfitLoss, &self.config.data.profit_loss_prefix)?;
        let balance_sheets = self.load_reports(ReportKind::BalanceSheet, &self.config.data.balance_prefix)?;

        // The table is rewritten before anything is derived from it
        let development_path = self.config.development_path();
        let (table, reconciliation) = reconcile_file(&development_path, &balance_sheets, &self.aliases)?;

        let years = profit_loss.years();
        if years.is_empty() {
            warn!(
                "No {}_<YYYY>.csv files found, income and expense data will be empty",
                self.config.data.profit_loss_prefix
            );
        } else {
            info!("Profit/loss years: {}", years.join(", "));
        }

        let liability_deltas = load_liability_deltas(&development_path, &years, &self.aliases);
        let debt_service = self.config.reports.debt_service_category.as_deref();

        let mut income_by_year = BTreeMap::new();
        let mut expenses_by_year = BTreeMap::new();
        for (year, report) in &profit_loss.reports {
            let income = classify_income(&report.rows);
            let mut expenses = classify_expense(&report.rows);

            let delta = liability_deltas.get(year).copied().unwrap_or(Decimal::ZERO);
            if add_debt_service(&mut expenses, delta, debt_service) {
                debug!("Added debt service of {} for {}", delta.abs(), year);
            }

            debug!(
                "{}: {} income and {} expense categories",
                year,
                income.len(),
                expenses.len()
            );
            income_by_year.insert(year.clone(), income);
            expenses_by_year.insert(year.clone(), expenses);
        }

        let income = RankedDataset::build(&income_by_year);
        let expenses = RankedDataset::build(&expenses_by_year);

        let expense_pie = profit_loss.latest_year().and_then(|year| {
            expenses_by_year.get(year).map(|map| {
                PieDataset::build(
                    year,
                    map,
                    self.config.reports.top_items_count,
                    &self.config.reports.other_label,
                )
            })
        });

        let trend = TrendDataset::build(&table, &important_positions(&self.config.accounts));
        if trend.is_empty() {
            warn!("None of the tracked accounts appear in {}", development_path.display());
        }

        Ok(PresentationData {
            income,
            expenses,
            expense_pie,
            trend,
            liability_deltas,
            reconciliation,
        })
    }

    fn load_reports(&self, kind: ReportKind, prefix: &str) -> CoreResult<ReportSet> {
        let files = discover_reports(&self.config.data.path, prefix)?;
        let mut set = ReportSet::new(kind);

        for (year, path) in files {
            let doc = self.reader.read(&path)?;
            let report = YearlyReport::from_records(&year, kind, &doc.records);
            debug!("{} {}: {} rows from {}", kind, year, report.rows.len(), path.display());
            set.insert(report);
        }

        info!("Loaded {} {} reports", set.reports.len(), kind);
        Ok(set)
    }
}

// ==================== Tests ====================
