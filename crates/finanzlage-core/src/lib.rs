//! Core aggregation and reconciliation for finanzlage
//!
//! Classifies the rows of the yearly profit/loss and balance sheet exports,
//! keeps the development table in step with the newest balance sheet and
//! builds the datasets rendered into tables and charts.

pub mod error;
pub mod types;
pub mod accounts;
pub mod classify;
pub mod aggregate;
pub mod development;
pub mod ranking;
pub mod reports;
pub mod pipeline;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use types::{BalanceMap, BalanceSide, CategoryMap, LedgerRow, ReportSet, YearlyReport};
pub use accounts::{AccountAlias, AccountAliases, DEFAULT_ACCOUNT_ALIASES, DEFAULT_IMPORTANT_POSITIONS};
pub use classify::{classify_balances, classify_expense, classify_income};
pub use aggregate::{project_across_years, total_by_year, union_categories, YearMatrix};
pub use development::{
    liability_deltas, load_liability_deltas, reconcile, reconcile_file, DevelopmentTable, Position,
    ReconcileOutcome,
};
pub use ranking::{bucket_tail, percentage_shares, rank_by_total, Bucketed, RankedDataset};
pub use reports::{PieDataset, PieSlice, PresentationData, TrendDataset, TrendSeries};
pub use pipeline::{add_debt_service, Pipeline};

// Re-export for adapters working with amounts
pub use rust_decimal::Decimal;
