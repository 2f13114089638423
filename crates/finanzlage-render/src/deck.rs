//! Slide deck outline referencing the written tables and charts

use serde::{Deserialize, Serialize};

use finanzlage_core::PresentationData;

/// One slide of the outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    /// File name of the chart definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    /// File name of the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Ordered slides of the financial overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckOutline {
    pub title: String,
    /// Suggested name of the rendered presentation
    pub file_name: String,
    pub slides: Vec<Slide>,
}

pub const INCOME_TITLE: &str = "Einnahmen";
pub const EXPENSES_TITLE: &str = "Ausgaben";
pub const EXPENSE_PIE_TITLE: &str = "Ausgaben nach Kategorien";
pub const TREND_TITLE: &str = "Entwicklung der Kontostände";

/// Output file names shared by the writer and the outline
pub mod files {
    pub const INCOME_TABLE: &str = "einnahmen.csv";
    pub const INCOME_CHART: &str = "einnahmen_chart.json";
    pub const EXPENSES_TABLE: &str = "ausgaben.csv";
    pub const EXPENSES_CHART: &str = "ausgaben_chart.json";
    pub const EXPENSE_PIE_TABLE: &str = "ausgaben_kategorien.csv";
    pub const EXPENSE_PIE_CHART: &str = "ausgaben_kategorien_chart.json";
    pub const TREND_TABLE: &str = "entwicklung_konten.csv";
    pub const TREND_CHART: &str = "entwicklung_konten_chart.json";
    pub const DECK: &str = "praesentation.json";
}

fn slide(title: &str, chart: &str, table: &str, note: Option<String>) -> Slide {
    Slide {
        title: title.to_string(),
        chart: Some(chart.to_string()),
        table: Some(table.to_string()),
        note,
    }
}

/// Income, expenses, expense breakdown and account trend, in that order.
///
/// The breakdown slide is left out when there is no profit/loss year, the
/// trend slide when no tracked account is in the development table.
pub fn build_deck(data: &PresentationData) -> DeckOutline {
    let mut slides = vec![
        slide(INCOME_TITLE, files::INCOME_CHART, files::INCOME_TABLE, None),
        slide(EXPENSES_TITLE, files::EXPENSES_CHART, files::EXPENSES_TABLE, None),
    ];

    if let Some(pie) = &data.expense_pie {
        slides.push(slide(
            EXPENSE_PIE_TITLE,
            files::EXPENSE_PIE_CHART,
            files::EXPENSE_PIE_TABLE,
            Some(format!("Daten für {}", pie.year)),
        ));
    }

    if !data.trend.is_empty() {
        slides.push(slide(TREND_TITLE, files::TREND_CHART, files::TREND_TABLE, None));
    }

    let file_name = match data.latest_year() {
        Some(year) => format!("Finanzlage_{}.pptx", year),
        None => "Finanzlage.pptx".to_string(),
    };

    DeckOutline {
        title: "Finanzlage".to_string(),
        file_name,
        slides,
    }
}
