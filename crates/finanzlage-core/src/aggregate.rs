//! Multi-year category aggregation

use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use finanzlage_utils::saturating_sum;

use crate::types::CategoryMap;

/// Category to year to value, every pair present
pub type YearMatrix = BTreeMap<String, BTreeMap<String, Decimal>>;

/// Union of all category names, sorted ascending
pub fn union_categories<'a, I>(per_year_maps: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a CategoryMap>,
{
    let names: BTreeSet<&String> = per_year_maps
        .into_iter()
        .flat_map(|map| map.keys())
        .collect();
    names.into_iter().cloned().collect()
}

/// Spread each category over every year, `0` where a year lacks it
pub fn project_across_years(
    categories: &[String],
    years: &[String],
    per_year_maps: &BTreeMap<String, CategoryMap>,
) -> YearMatrix {
    categories
        .iter()
        .map(|category| {
            let values = years
                .iter()
                .map(|year| {
                    let value = per_year_maps
                        .get(year)
                        .and_then(|map| map.get(category))
                        .copied()
                        .unwrap_or(Decimal::ZERO);
                    (year.clone(), value)
                })
                .collect();
            (category.clone(), values)
        })
        .collect()
}

/// Sum of one year's categories
pub fn total_by_year(map: &CategoryMap) -> Decimal {
    saturating_sum(map.values().copied())
}
