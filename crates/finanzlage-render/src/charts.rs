//! Chart definitions serialised as JSON

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use finanzlage_config::ChartConfig;
use finanzlage_core::{PieDataset, RankedDataset, TrendDataset};
use finanzlage_utils::format_locale_integer;

/// Chart data for visualization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub chart_type: String,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub options: serde_json::Value,
}

/// Chart dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Palette entry for series `index`, wrapping around
pub fn color_at(colors: &[String], index: usize) -> Option<String> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[index % colors.len()].clone())
}

/// Upper bound on the number of y axis intervals
pub const MAX_AXIS_TICKS: u64 = 20;

/// Tick interval for `max`: `base_step`, widened to a multiple of it when
/// more than [`MAX_AXIS_TICKS`] intervals would be needed
pub fn axis_step(max: Decimal, base_step: u64) -> Decimal {
    let base = Decimal::from(base_step.max(1));
    if max <= Decimal::ZERO {
        return base;
    }
    let intervals = (max / base).ceil();
    let limit = Decimal::from(MAX_AXIS_TICKS);
    if intervals <= limit {
        return base;
    }
    let factor = (intervals / limit).ceil();
    base.checked_mul(factor).unwrap_or(Decimal::MAX)
}

/// Smallest multiple of `step` that is at least `max` (one step for empty charts)
pub fn axis_max(max: Decimal, step: Decimal) -> Decimal {
    if max <= Decimal::ZERO || step <= Decimal::ZERO {
        return step.max(Decimal::ONE);
    }
    (max / step).ceil().checked_mul(step).unwrap_or(max)
}

/// Y axis labels from zero to `max` in `step` increments
fn axis_ticks(max: Decimal, step: Decimal) -> Vec<String> {
    let mut ticks = Vec::new();
    if step <= Decimal::ZERO {
        return ticks;
    }
    let mut tick = Decimal::ZERO;
    while tick <= max && ticks.len() as u64 <= MAX_AXIS_TICKS {
        ticks.push(format_locale_integer(tick));
        match tick.checked_add(step) {
            Some(next) => tick = next,
            None => break,
        }
    }
    ticks
}

/// One stacked series per category, years on the x axis
pub fn stacked_bar_chart(title: &str, dataset: &RankedDataset, config: &ChartConfig) -> ChartData {
    let datasets = dataset
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let color = color_at(&config.colors, i);
            ChartDataset {
                label: category.clone(),
                data: dataset
                    .years
                    .iter()
                    .map(|year| to_f64(dataset.value(category, year)))
                    .collect(),
                background_color: color.clone(),
                border_color: color,
            }
        })
        .collect();

    let step = axis_step(dataset.max_total(), config.axis_step);
    let y_max = axis_max(dataset.max_total(), step);

    ChartData {
        chart_type: "bar".to_string(),
        title: title.to_string(),
        labels: dataset.years.clone(),
        datasets,
        options: serde_json::json!({
            "stacked": true,
            "show_legend": config.show_legend,
            "y_axis": {
                "min": 0,
                "max": to_f64(y_max),
                "step": to_f64(step),
                "tick_labels": axis_ticks(y_max, step),
                "title": "Betrag (EUR)",
            },
            "x_axis": { "title": "Jahr" },
        }),
    }
}

/// Pie of one year's slices
pub fn pie_chart(title: &str, pie: &PieDataset, config: &ChartConfig) -> ChartData {
    let colors: Vec<String> = (0..pie.slices.len())
        .filter_map(|i| color_at(&config.colors, i))
        .collect();

    ChartData {
        chart_type: "pie".to_string(),
        title: title.to_string(),
        labels: pie.slices.iter().map(|s| s.label.clone()).collect(),
        datasets: vec![ChartDataset {
            label: "Ausgaben".to_string(),
            data: pie.slices.iter().map(|s| to_f64(s.value)).collect(),
            background_color: None,
            border_color: None,
        }],
        options: serde_json::json!({
            "show_legend": config.show_legend,
            "colors": colors,
            "year": pie.year,
        }),
    }
}

/// One line per account, loans as positive magnitudes
pub fn line_chart(title: &str, trend: &TrendDataset, config: &ChartConfig) -> ChartData {
    let datasets = trend
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let color = color_at(&config.colors, i);
            ChartDataset {
                label: series.position.clone(),
                data: trend
                    .years
                    .iter()
                    .map(|year| to_f64(series.chart_value(year)))
                    .collect(),
                background_color: color.clone(),
                border_color: color,
            }
        })
        .collect();

    ChartData {
        chart_type: "line".to_string(),
        title: title.to_string(),
        labels: trend.years.clone(),
        datasets,
        options: serde_json::json!({
            "show_legend": config.show_legend,
            "y_axis": { "title": "Betrag (EUR)" },
            "x_axis": { "title": "Jahr" },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finanzlage_core::{CategoryMap, TrendSeries};
    use finanzlage_utils::parse_locale_number;
    use std::collections::BTreeMap;

    fn config() -> ChartConfig {
        ChartConfig {
            axis_step: 20_000,
            colors: vec!["#111111".to_string(), "#222222".to_string()],
            show_legend: true,
        }
    }

    fn step() -> Decimal {
        Decimal::from(20_000)
    }

    #[test]
    fn test_axis_max() {
        assert_eq!(axis_max(Decimal::from(45_000), step()), Decimal::from(60_000));
        assert_eq!(axis_max(Decimal::from(40_000), step()), Decimal::from(40_000));
        assert_eq!(axis_max(Decimal::new(1, 2), step()), Decimal::from(20_000));
        assert_eq!(axis_max(Decimal::ZERO, step()), Decimal::from(20_000));
    }

    #[test]
    fn test_axis_ticks() {
        assert_eq!(axis_ticks(Decimal::from(60_000), step()), vec!["0", "20.000", "40.000", "60.000"]);
    }

    #[test]
    fn test_axis_step_keeps_base_for_normal_values() {
        assert_eq!(axis_step(Decimal::from(45_000), 20_000), step());
        assert_eq!(axis_step(Decimal::from(400_000), 20_000), step());
        assert_eq!(axis_step(Decimal::ZERO, 20_000), step());
    }

    #[test]
    fn test_huge_values_limit_ticks() {
        let max = parse_locale_number("1e11");
        let step = axis_step(max, 20_000);
        assert_eq!(step, Decimal::from(5_000_000_000u64));
        let y_max = axis_max(max, step);
        assert_eq!(y_max, Decimal::from(100_000_000_000u64));
        assert_eq!(axis_ticks(y_max, step).len(), 21);

        let limit = axis_step(Decimal::MAX, 20_000);
        let ticks = axis_ticks(axis_max(Decimal::MAX, limit), limit);
        assert!(ticks.len() as u64 <= MAX_AXIS_TICKS + 1);
    }

    #[test]
    fn test_color_cycle() {
        let colors = config().colors;
        assert_eq!(color_at(&colors, 0).as_deref(), Some("#111111"));
        assert_eq!(color_at(&colors, 3).as_deref(), Some("#222222"));
        assert_eq!(color_at(&[], 3), None);
    }

    #[test]
    fn test_stacked_bar_chart() {
        let mut per_year: BTreeMap<String, CategoryMap> = BTreeMap::new();
        per_year.insert(
            "2023".to_string(),
            [("Miete".to_string(), Decimal::from(30_000)), ("Strom".to_string(), Decimal::from(5_000))].into(),
        );
        per_year.insert("2024".to_string(), [("Wasser".to_string(), Decimal::from(100))].into());
        let dataset = RankedDataset::build(&per_year);

        let chart = stacked_bar_chart("Ausgaben", &dataset, &config());
        assert_eq!(chart.chart_type, "bar");
        assert_eq!(chart.labels, vec!["2023", "2024"]);
        assert_eq!(chart.datasets.len(), 3);
        assert_eq!(chart.datasets[0].label, "Miete");
        assert_eq!(chart.datasets[0].data, vec![30_000.0, 0.0]);
        assert_eq!(chart.datasets[2].background_color.as_deref(), Some("#111111"));
        assert_eq!(chart.options["y_axis"]["max"], serde_json::json!(40_000.0));
        assert_eq!(chart.options["stacked"], serde_json::json!(true));
    }

    #[test]
    fn test_pie_chart() {
        let map: CategoryMap = [
            ("Miete".to_string(), Decimal::from(300)),
            ("Strom".to_string(), Decimal::from(100)),
            ("Porto".to_string(), Decimal::from(50)),
        ]
        .into();
        let pie = PieDataset::build("2024", &map, 1, "Sonstige");
        let chart = pie_chart("Ausgaben nach Kategorien", &pie, &config());

        assert_eq!(chart.labels, vec!["Miete", "Sonstige"]);
        assert_eq!(chart.datasets[0].data, vec![300.0, 150.0]);
        assert_eq!(chart.options["colors"], serde_json::json!(["#111111", "#222222"]));
    }

    #[test]
    fn test_line_chart_uses_magnitudes() {
        let trend = TrendDataset {
            years: vec!["2023".to_string(), "2024".to_string()],
            series: vec![TrendSeries {
                position: "Darlehenskonto SKB 004".to_string(),
                values: [
                    ("2023".to_string(), Decimal::from(-2500)),
                    ("2024".to_string(), Decimal::from(-2000)),
                ]
                .into(),
                is_liability: true,
            }],
        };
        let chart = line_chart("Entwicklung der Kontostände", &trend, &config());
        assert_eq!(chart.chart_type, "line");
        assert_eq!(chart.datasets[0].data, vec![2500.0, 2000.0]);
    }
}
