//! Render adapters for finanzlage
//!
//! Turns `PresentationData` into German formatted tables, chart
//! definitions and a slide outline, and writes them to disk.

use log::info;
use std::path::PathBuf;

use finanzlage_config::Config;
use finanzlage_core::PresentationData;

pub mod error;
pub mod tables;
pub mod charts;
pub mod deck;
pub mod writer;

pub use error::{RenderError, RenderResult};
pub use tables::{category_table, pie_table, trend_table, Table};
pub use charts::{axis_max, axis_step, line_chart, pie_chart, stacked_bar_chart, ChartData, ChartDataset};
pub use deck::{build_deck, DeckOutline, Slide};
pub use writer::OutputWriter;

use deck::{files, EXPENSES_TITLE, EXPENSE_PIE_TITLE, INCOME_TITLE, TREND_TITLE};

/// Everything produced for one run, keyed by output file name
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub tables: Vec<(String, Table)>,
    pub charts: Vec<(String, ChartData)>,
    pub deck: DeckOutline,
}

/// Build all tables, charts and the deck outline
pub fn render(data: &PresentationData, config: &Config) -> RenderedOutput {
    let total_label = &config.reports.total_label;
    let charts_config = &config.charts;

    let mut tables = vec![
        (
            files::INCOME_TABLE.to_string(),
            category_table(INCOME_TITLE, &data.income, total_label),
        ),
        (
            files::EXPENSES_TABLE.to_string(),
            category_table(EXPENSES_TITLE, &data.expenses, total_label),
        ),
    ];
    let mut charts = vec![
        (
            files::INCOME_CHART.to_string(),
            stacked_bar_chart(INCOME_TITLE, &data.income, charts_config),
        ),
        (
            files::EXPENSES_CHART.to_string(),
            stacked_bar_chart(EXPENSES_TITLE, &data.expenses, charts_config),
        ),
    ];

    if let Some(pie) = &data.expense_pie {
        tables.push((files::EXPENSE_PIE_TABLE.to_string(), pie_table(EXPENSE_PIE_TITLE, pie)));
        charts.push((
            files::EXPENSE_PIE_CHART.to_string(),
            pie_chart(EXPENSE_PIE_TITLE, pie, charts_config),
        ));
    }

    if !data.trend.is_empty() {
        tables.push((files::TREND_TABLE.to_string(), trend_table(TREND_TITLE, &data.trend)));
        charts.push((
            files::TREND_CHART.to_string(),
            line_chart(TREND_TITLE, &data.trend, charts_config),
        ));
    }

    RenderedOutput {
        tables,
        charts,
        deck: build_deck(data),
    }
}

/// Write every output; returns the written paths
pub fn write_outputs(output: &RenderedOutput, writer: &OutputWriter) -> RenderResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (name, table) in &output.tables {
        written.push(writer.write_table(name, table)?);
    }
    for (name, chart) in &output.charts {
        written.push(writer.write_json(name, chart)?);
    }
    written.push(writer.write_json(files::DECK, &output.deck)?);

    info!("Wrote {} files to {}", written.len(), writer.dir().display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finanzlage_core::{CategoryMap, Decimal, PieDataset, RankedDataset};
    use std::collections::BTreeMap;

    fn data() -> PresentationData {
        let mut per_year: BTreeMap<String, CategoryMap> = BTreeMap::new();
        per_year.insert("2024".to_string(), [("Miete".to_string(), Decimal::from(500))].into());

        let mut data = PresentationData::default();
        data.expenses = RankedDataset::build(&per_year);
        data.expense_pie = Some(PieDataset::build("2024", &per_year["2024"], 10, "Sonstige"));
        data
    }

    #[test]
    fn test_render_skips_missing_sections() {
        let output = render(&data(), &Config::default());
        let names: Vec<&str> = output.tables.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["einnahmen.csv", "ausgaben.csv", "ausgaben_kategorien.csv"]);
        assert_eq!(output.charts.len(), 3);
        assert_eq!(output.deck.slides.len(), 3);
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(&dir.path().join("result")).unwrap();
        let written = write_outputs(&render(&data(), &Config::default()), &writer).unwrap();

        assert_eq!(written.len(), 7);
        assert!(written.iter().all(|p| p.is_file()));
        let expenses = std::fs::read_to_string(dir.path().join("result").join("ausgaben.csv")).unwrap();
        assert_eq!(expenses, "Kategorie;2024\nMiete;500,00 €\nGesamt;500,00 €\n");
    }
}
