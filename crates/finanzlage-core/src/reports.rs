//! Report structures handed to the render adapters

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::accounts::is_liability;
use crate::aggregate::{project_across_years, total_by_year};
use crate::development::{DevelopmentTable, ReconcileOutcome};
use crate::ranking::{bucket_tail, rank_by_total, share_of, RankedDataset};
use crate::types::CategoryMap;

// ==================== Pie ====================

/// One slice of the expense breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Decimal,
    /// Percentage of the year total, one decimal
    pub share: Decimal,
    /// True for the bucket collecting the smaller categories
    pub is_other: bool,
}

/// Expense breakdown of a single year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDataset {
    pub year: String,
    pub slices: Vec<PieSlice>,
    pub total: Decimal,
}

impl PieDataset {
    /// Largest categories first, the rest summed into one `other_label` slice
    pub fn build(year: &str, expenses: &CategoryMap, keep_top: usize, other_label: &str) -> Self {
        let years = vec![year.to_string()];
        let mut per_year = BTreeMap::new();
        per_year.insert(year.to_string(), expenses.clone());

        let categories: Vec<String> = expenses.keys().cloned().collect();
        let values = project_across_years(&categories, &years, &per_year);
        let ranked = rank_by_total(&categories, &values, &years);
        let bucketed = bucket_tail(&ranked, &values, &years, keep_top);
        let total = total_by_year(expenses);

        let mut slices: Vec<PieSlice> = bucketed
            .top
            .iter()
            .map(|label| {
                let value = expenses.get(label).copied().unwrap_or(Decimal::ZERO);
                PieSlice {
                    label: label.clone(),
                    value,
                    share: share_of(value, total),
                    is_other: false,
                }
            })
            .collect();

        if let Some(other) = bucketed.other {
            let value = other.get(year).copied().unwrap_or(Decimal::ZERO);
            slices.push(PieSlice {
                label: other_label.to_string(),
                value,
                share: share_of(value, total),
                is_other: true,
            });
        }

        Self {
            year: year.to_string(),
            slices,
            total,
        }
    }
}

// ==================== Account Trend ====================

/// One development table row over the years
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub position: String,
    /// Signed values as stored, blank cells absent
    pub values: BTreeMap<String, Decimal>,
    pub is_liability: bool,
}

impl TrendSeries {
    /// Signed value for tables, `0` when blank
    pub fn table_value(&self, year: &str) -> Decimal {
        self.values.get(year).copied().unwrap_or(Decimal::ZERO)
    }

    /// Loans are charted as positive magnitudes
    pub fn chart_value(&self, year: &str) -> Decimal {
        let value = self.table_value(year);
        if self.is_liability {
            value.abs()
        } else {
            value
        }
    }
}

/// Selected development table rows over its year columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendDataset {
    pub years: Vec<String>,
    pub series: Vec<TrendSeries>,
}

impl TrendDataset {
    /// Rows in the order of `important`; names missing from the table are skipped
    pub fn build(table: &DevelopmentTable, important: &[String]) -> Self {
        let years = table.years();
        let series = important
            .iter()
            .filter_map(|name| table.position(name))
            .map(|position| TrendSeries {
                position: position.name.clone(),
                values: years
                    .iter()
                    .filter_map(|y| position.value(y).map(|v| (y.clone(), v)))
                    .collect(),
                is_liability: is_liability(&position.name),
            })
            .collect();

        Self { years, series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ==================== Presentation ====================

/// Everything the render adapters need
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationData {
    pub income: RankedDataset,
    pub expenses: RankedDataset,
    /// Breakdown of the newest profit/loss year, `None` without reports
    pub expense_pie: Option<PieDataset>,
    pub trend: TrendDataset,
    pub liability_deltas: BTreeMap<String, Decimal>,
    pub reconciliation: ReconcileOutcome,
}

impl PresentationData {
    /// Newest profit/loss year
    pub fn latest_year(&self) -> Option<&str> {
        self.expenses
            .years
            .last()
            .or_else(|| self.income.years.last())
            .map(|y| y.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finanzlage_parser::parse_records;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn expenses(entries: &[(&str, i64)]) -> CategoryMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Decimal::from(*v)))
            .collect()
    }

    #[test]
    fn test_pie_with_other_bucket() {
        let map = expenses(&[("Miete", 600), ("Strom", 200), ("Wasser", 120), ("Porto", 80)]);
        let pie = PieDataset::build("2024", &map, 2, "Sonstige");

        assert_eq!(pie.total, Decimal::from(1000));
        assert_eq!(pie.slices.len(), 3);
        assert_eq!(pie.slices[0].label, "Miete");
        assert_eq!(pie.slices[0].share, dec("60.0"));
        assert_eq!(pie.slices[2].label, "Sonstige");
        assert!(pie.slices[2].is_other);
        assert_eq!(pie.slices[2].value, Decimal::from(200));
        assert_eq!(pie.slices[2].share, dec("20.0"));
    }

    #[test]
    fn test_pie_without_bucket() {
        let map = expenses(&[("Miete", 1), ("Strom", 2)]);
        let pie = PieDataset::build("2024", &map, 10, "Sonstige");
        let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Strom", "Miete"]);
        assert!(pie.slices.iter().all(|s| !s.is_other));
    }

    #[test]
    fn test_pie_zero_total() {
        let map = expenses(&[("Miete", 0)]);
        let pie = PieDataset::build("2024", &map, 10, "Sonstige");
        assert_eq!(pie.slices[0].share, Decimal::ZERO);
    }

    #[test]
    fn test_trend_dataset() {
        let doc = parse_records(
            "Position;2024;2023\nGirokonto SKB 001;1500,00;\nDarlehenskonto SKB 004;-2000,00;-2500,00\nSumme Aktiva;1500,00;0\n",
        )
        .unwrap();
        let table = DevelopmentTable::from_document(&doc).unwrap();
        let important = vec![
            "Darlehenskonto SKB 004".to_string(),
            "Privatdarlehen 006".to_string(),
            "Girokonto SKB 001".to_string(),
        ];
        let trend = TrendDataset::build(&table, &important);

        assert_eq!(trend.years, vec!["2023", "2024"]);
        assert_eq!(trend.series.len(), 2);
        let loan = &trend.series[0];
        assert!(loan.is_liability);
        assert_eq!(loan.table_value("2023"), dec("-2500"));
        assert_eq!(loan.chart_value("2023"), dec("2500"));

        let giro = &trend.series[1];
        assert_eq!(giro.table_value("2023"), Decimal::ZERO);
        assert_eq!(giro.chart_value("2024"), dec("1500"));
    }

    #[test]
    fn test_latest_year() {
        let mut data = PresentationData::default();
        assert_eq!(data.latest_year(), None);
        data.income.years = vec!["2022".to_string(), "2023".to_string()];
        assert_eq!(data.latest_year(), Some("2023"));
    }
}
