//! Ranking, tail bucketing and percentage shares for presentation

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use finanzlage_utils::saturating_sum;

use crate::aggregate::{project_across_years, total_by_year, union_categories, YearMatrix};
use crate::types::CategoryMap;

/// Buckets whose yearly sums all stay below this are dropped
fn other_threshold() -> Decimal {
    Decimal::new(1, 4)
}

fn multi_year_total(values: &YearMatrix, category: &str, years: &[String]) -> Decimal {
    values
        .get(category)
        .map(|by_year| {
            saturating_sum(years.iter().filter_map(|y| by_year.get(y)).copied())
        })
        .unwrap_or(Decimal::ZERO)
}

/// Sort categories by their total over `years`, largest first.
///
/// The sort is stable, categories with equal totals keep their input order.
pub fn rank_by_total(categories: &[String], per_year_values: &YearMatrix, years: &[String]) -> Vec<String> {
    let mut ranked: Vec<(String, Decimal)> = categories
        .iter()
        .map(|c| (c.clone(), multi_year_total(per_year_values, c, years)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(c, _)| c).collect()
}

/// Top categories plus the summed remainder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucketed {
    pub top: Vec<String>,
    /// Year to summed value of every category outside `top`
    pub other: Option<BTreeMap<String, Decimal>>,
}

/// Keep the `keep_top` largest categories by absolute total and sum the rest per year
pub fn bucket_tail(
    ranked: &[String],
    per_year_values: &YearMatrix,
    years: &[String],
    keep_top: usize,
) -> Bucketed {
    let mut by_magnitude: Vec<(String, Decimal)> = ranked
        .iter()
        .map(|c| (c.clone(), multi_year_total(per_year_values, c, years).abs()))
        .collect();
    by_magnitude.sort_by(|a, b| b.1.cmp(&a.1));

    let split = keep_top.min(by_magnitude.len());
    let top: Vec<String> = by_magnitude[..split].iter().map(|(c, _)| c.clone()).collect();
    let rest = &by_magnitude[split..];

    if rest.is_empty() {
        return Bucketed { top, other: None };
    }

    let other: BTreeMap<String, Decimal> = years
        .iter()
        .map(|year| {
            let sum = saturating_sum(
                rest.iter()
                    .filter_map(|(c, _)| per_year_values.get(c).and_then(|v| v.get(year)))
                    .copied(),
            );
            (year.clone(), sum)
        })
        .collect();

    let negligible = other.values().all(|v| v.abs() < other_threshold());
    Bucketed {
        top,
        other: if negligible { None } else { Some(other) },
    }
}

/// Share of `value` in `total` as a percentage with one decimal; `0` when `total` is zero
pub fn share_of(value: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    value
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

/// Percentage share of every entry in `total`
pub fn percentage_shares(values: &BTreeMap<String, Decimal>, total: Decimal) -> BTreeMap<String, Decimal> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), share_of(*value, total)))
        .collect()
}

// ==================== Ranked Dataset ====================

/// Categories of one classification over all report years
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedDataset {
    /// Ascending
    pub years: Vec<String>,
    /// Largest multi-year total first
    pub categories: Vec<String>,
    /// Every (category, year) pair, `0` when absent
    pub per_year_values: YearMatrix,
    pub totals_by_year: BTreeMap<String, Decimal>,
}

impl RankedDataset {
    /// Build from one category map per year
    pub fn build(per_year_maps: &BTreeMap<String, CategoryMap>) -> Self {
        let years: Vec<String> = per_year_maps.keys().cloned().collect();
        let categories = union_categories(per_year_maps.values());
        let per_year_values = project_across_years(&categories, &years, per_year_maps);
        let ranked = rank_by_total(&categories, &per_year_values, &years);
        let totals_by_year = per_year_maps
            .iter()
            .map(|(year, map)| (year.clone(), total_by_year(map)))
            .collect();

        Self {
            years,
            categories: ranked,
            per_year_values,
            totals_by_year,
        }
    }

    pub fn value(&self, category: &str, year: &str) -> Decimal {
        self.per_year_values
            .get(category)
            .and_then(|v| v.get(year))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self, year: &str) -> Decimal {
        self.totals_by_year.get(year).copied().unwrap_or(Decimal::ZERO)
    }

    /// Largest yearly total, the height of the tallest stacked bar
    pub fn max_total(&self) -> Decimal {
        self.totals_by_year.values().copied().max().unwrap_or(Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
