//! # ridership-viz
//!
//! Chart specifications for the ridership views.
//!
//! This crate turns normalized records into chart specifications that can
//! be rendered by:
//! - the static HTML/Chart.js dashboard in [`render_dashboard`]
//! - any frontend that accepts the JSON form of [`ChartSpec`]
//!
//! Values are never reformatted here; thousands separators are applied only
//! when text is rendered (see [`format_thousands`]).

mod dashboard;
mod format;

pub use dashboard::{escape_html, render_dashboard};
pub use format::{format_cell, format_thousands};

use ridership_core::CellValue;
use ridership_series::{ChartSeriesRecord, View};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bar fills for the 2023 view, one per season.
pub const PALETTE_2023: [&str; 4] = ["#94a3b8", "#86efac", "#fde047", "#fb923c"];
/// Bar fills for the 2024 view, one per season.
pub const PALETTE_2024: [&str; 4] = ["#475569", "#16a34a", "#ca8a04", "#ea580c"];
/// Line strokes for the comparison view, one per year.
pub const PALETTE_COMPARISON: [&str; 2] = ["#8884d8", "#82ca9d"];

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Failed to serialize chart: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type VizResult<T> = Result<T, VizError>;

/// Chart specification for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartKind,
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Chart type for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Chart data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A dataset in a chart. `None` points are gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

/// Chart rendering options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis_label: Option<String>,
    pub show_legend: bool,
}

/// Series colors of a view, in value-field order.
#[must_use]
pub fn palette(view: View) -> &'static [&'static str] {
    match view {
        View::Ridership2023 => &PALETTE_2023,
        View::Ridership2024 => &PALETTE_2024,
        View::Comparison => &PALETTE_COMPARISON,
    }
}

impl ChartSpec {
    /// Create a new chart specification.
    #[must_use]
    pub fn new(chart_type: ChartKind, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            data: ChartData::default(),
            options: ChartOptions::default(),
        }
    }

    /// Build the chart for one view from its normalized records.
    ///
    /// Single-year views are grouped bars per station; the comparison view
    /// is one line per year across the seasons. Labels come from the view's
    /// category field, and a missing or non-numeric value becomes a gap.
    #[must_use]
    pub fn from_view(view: View, records: &[ChartSeriesRecord]) -> Self {
        let chart_type = match view {
            View::Comparison => ChartKind::Line,
            View::Ridership2023 | View::Ridership2024 => ChartKind::Bar,
        };
        let category = view.category_field();

        let labels = records
            .iter()
            .map(|r| r.get(category).map(ToString::to_string).unwrap_or_default())
            .collect();

        let datasets = view
            .value_fields()
            .into_iter()
            .zip(palette(view))
            .map(|(field, color)| Dataset {
                label: field.to_string(),
                data: records
                    .iter()
                    .map(|r| r.get(field).and_then(CellValue::as_float))
                    .collect(),
                background_color: Some((*color).to_string()),
                border_color: Some((*color).to_string()),
            })
            .collect();

        Self {
            chart_type,
            title: view.title().to_string(),
            data: ChartData { labels, datasets },
            options: ChartOptions {
                x_axis_label: Some(category.to_string()),
                y_axis_label: Some("Ridership".to_string()),
                show_legend: true,
            },
        }
    }

    /// Convert to JSON string for frontend rendering.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, winter: Option<CellValue>) -> ChartSeriesRecord {
        [
            ("Station", Some(CellValue::from(name))),
            ("Winter", winter),
            ("Spring", Some(CellValue::Int(20))),
            ("Summer", None),
            ("Fall", Some(CellValue::from("n/a"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_chart_spec_new() {
        let chart = ChartSpec::new(ChartKind::Bar, "Test Chart");
        assert_eq!(chart.title, "Test Chart");
        assert!(matches!(chart.chart_type, ChartKind::Bar));
        assert!(chart.data.labels.is_empty());
    }

    #[test]
    fn test_station_view_chart() {
        let records = vec![
            station("Times Sq", Some(CellValue::Float(100.5))),
            station("Union Sq", None),
        ];

        let chart = ChartSpec::from_view(View::Ridership2023, &records);

        assert_eq!(chart.chart_type, ChartKind::Bar);
        assert_eq!(chart.data.labels, vec!["Times Sq", "Union Sq"]);
        assert_eq!(chart.data.datasets.len(), 4);

        let winter = &chart.data.datasets[0];
        assert_eq!(winter.label, "Winter");
        assert_eq!(winter.data, vec![Some(100.5), None]);
        assert_eq!(winter.background_color.as_deref(), Some("#94a3b8"));
        // absent and non-numeric values are gaps
        assert_eq!(chart.data.datasets[2].data, vec![None, None]);
        assert_eq!(chart.data.datasets[3].data, vec![None, None]);
    }

    #[test]
    fn test_comparison_chart() {
        let records: Vec<ChartSeriesRecord> = vec![[
            ("season", Some(CellValue::from("Winter"))),
            ("2023", Some(CellValue::Int(100))),
            ("2024", Some(CellValue::Int(90))),
        ]
        .into_iter()
        .collect()];

        let chart = ChartSpec::from_view(View::Comparison, &records);

        assert_eq!(chart.chart_type, ChartKind::Line);
        assert_eq!(chart.data.labels, vec!["Winter"]);
        let colors: Vec<_> = chart
            .data
            .datasets
            .iter()
            .map(|d| d.border_color.as_deref())
            .collect();
        assert_eq!(colors, vec![Some("#8884d8"), Some("#82ca9d")]);
        assert_eq!(chart.data.datasets[1].data, vec![Some(90.0)]);
    }

    #[test]
    fn test_missing_label_is_blank() {
        let records: Vec<ChartSeriesRecord> = vec![[("season", None)].into_iter().collect()];
        let chart = ChartSpec::from_view(View::Comparison, &records);
        assert_eq!(chart.data.labels, vec![String::new()]);
    }

    #[test]
    fn test_chart_to_json() {
        let records = vec![station("A", None)];
        let json = ChartSpec::from_view(View::Ridership2024, &records)
            .to_json()
            .unwrap();
        assert!(json.contains("\"chart_type\":\"bar\""));
        assert!(json.contains("\"data\":[null]"));
        assert!(json.contains("#475569"));
    }
}
