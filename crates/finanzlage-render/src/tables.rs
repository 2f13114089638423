//! Text tables with German formatted cells

use serde::{Deserialize, Serialize};

use finanzlage_core::{PieDataset, RankedDataset, TrendDataset};
use finanzlage_parser::records_to_string;
use finanzlage_utils::{format_euro, format_locale_percent};

use crate::error::RenderResult;

/// A titled table of preformatted cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Serialize as `;` separated CSV
    pub fn to_csv(&self) -> RenderResult<String> {
        Ok(records_to_string(&self.header, &self.rows)?)
    }
}

/// Categories by year with a total row (`Kategorie`, years..., `Gesamt` row)
pub fn category_table(title: &str, dataset: &RankedDataset, total_label: &str) -> Table {
    let mut header = vec!["Kategorie".to_string()];
    header.extend(dataset.years.iter().cloned());

    let mut rows: Vec<Vec<String>> = dataset
        .categories
        .iter()
        .map(|category| {
            let mut row = vec![category.clone()];
            row.extend(
                dataset
                    .years
                    .iter()
                    .map(|year| format_euro(dataset.value(category, year))),
            );
            row
        })
        .collect();

    let mut total_row = vec![total_label.to_string()];
    total_row.extend(dataset.years.iter().map(|year| format_euro(dataset.total(year))));
    rows.push(total_row);

    Table {
        title: title.to_string(),
        header,
        rows,
    }
}

/// One row per slice with amount and share
pub fn pie_table(title: &str, pie: &PieDataset) -> Table {
    let rows = pie
        .slices
        .iter()
        .map(|slice| {
            vec![
                slice.label.clone(),
                format_euro(slice.value),
                format!("{} %", format_locale_percent(slice.share)),
            ]
        })
        .collect();

    Table {
        title: title.to_string(),
        header: vec!["Kategorie".to_string(), "Betrag".to_string(), "Anteil".to_string()],
        rows,
    }
}

/// Signed account balances by year
pub fn trend_table(title: &str, trend: &TrendDataset) -> Table {
    let mut header = vec!["Konto".to_string()];
    header.extend(trend.years.iter().cloned());

    let rows = trend
        .series
        .iter()
        .map(|series| {
            let mut row = vec![series.position.clone()];
            row.extend(
                trend
                    .years
                    .iter()
                    .map(|year| format_euro(series.table_value(year))),
            );
            row
        })
        .collect();

    Table {
        title: title.to_string(),
        header,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finanzlage_core::{CategoryMap, Decimal, TrendSeries};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dataset() -> RankedDataset {
        let mut per_year: BTreeMap<String, CategoryMap> = BTreeMap::new();
        per_year.insert(
            "2023".to_string(),
            [("Miete".to_string(), Decimal::from(4800)), ("Strom".to_string(), Decimal::from(600))].into(),
        );
        per_year.insert(
            "2024".to_string(),
            [("Miete".to_string(), Decimal::from_str("1234.5").unwrap())].into(),
        );
        RankedDataset::build(&per_year)
    }

    #[test]
    fn test_category_table() {
        let table = category_table("Ausgaben", &dataset(), "Gesamt");
        assert_eq!(table.header, vec!["Kategorie", "2023", "2024"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["Miete", "4.800,00 €", "1.234,50 €"]);
        assert_eq!(table.rows[1], vec!["Strom", "600,00 €", "0,00 €"]);
        assert_eq!(table.rows[2], vec!["Gesamt", "5.400,00 €", "1.234,50 €"]);
    }

    #[test]
    fn test_empty_category_table_has_total_row() {
        let table = category_table("Einnahmen", &RankedDataset::default(), "Gesamt");
        assert_eq!(table.header, vec!["Kategorie"]);
        assert_eq!(table.rows, vec![vec!["Gesamt".to_string()]]);
    }

    #[test]
    fn test_pie_table() {
        let map: CategoryMap = [
            ("Miete".to_string(), Decimal::from(2)),
            ("Strom".to_string(), Decimal::from(1)),
        ]
        .into();
        let pie = PieDataset::build("2024", &map, 10, "Sonstige");
        let table = pie_table("Ausgaben nach Kategorien", &pie);

        assert_eq!(table.header, vec!["Kategorie", "Betrag", "Anteil"]);
        assert_eq!(table.rows[0], vec!["Miete", "2,00 €", "66,7 %"]);
        assert_eq!(table.rows[1], vec!["Strom", "1,00 €", "33,3 %"]);
    }

    #[test]
    fn test_trend_table() {
        let trend = TrendDataset {
            years: vec!["2023".to_string(), "2024".to_string()],
            series: vec![TrendSeries {
                position: "Darlehenskonto SKB 004".to_string(),
                values: [("2024".to_string(), Decimal::from(-2000))].into(),
                is_liability: true,
            }],
        };
        let table = trend_table("Entwicklung der Kontostände", &trend);
        assert_eq!(table.header, vec!["Konto", "2023", "2024"]);
        assert_eq!(table.rows[0], vec!["Darlehenskonto SKB 004", "0,00 €", "-2.000,00 €"]);
    }

    #[test]
    fn test_table_to_csv() {
        let table = category_table("Ausgaben", &dataset(), "Gesamt");
        let csv = table.to_csv().unwrap();
        assert!(csv.starts_with("Kategorie;2023;2024\n"));
        assert!(csv.contains("Miete;4.800,00 €;1.234,50 €\n"));
    }
}
