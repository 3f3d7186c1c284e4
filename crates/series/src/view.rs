use crate::record::ChartSeriesRecord;
use crate::rule::{normalize, Rule};
use crate::seasonal::{year_sheet_name, Season, COMPARISON_SHEET};
use ridership_core::{CellValue, NamedTableSet};
use serde::{Deserialize, Serialize};

const STATION_FIELD: &str = "Station";
const SEASON_FIELD: &str = "season";
const COMPARISON_YEARS: [&str; 2] = ["2023", "2024"];

/// The three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Ridership2023,
    Ridership2024,
    Comparison,
}

impl View {
    /// Every view, in tab order.
    pub const ALL: [View; 3] = [View::Ridership2023, View::Ridership2024, View::Comparison];

    /// Sheet the view reads.
    #[must_use]
    pub fn sheet_name(self) -> String {
        match self {
            View::Ridership2023 => year_sheet_name(2023),
            View::Ridership2024 => year_sheet_name(2024),
            View::Comparison => COMPARISON_SHEET.to_string(),
        }
    }

    /// Name the view's records are exposed under.
    #[must_use]
    pub fn output_name(self) -> &'static str {
        match self {
            View::Ridership2023 => "ridership2023",
            View::Ridership2024 => "ridership2024",
            View::Comparison => "comparison",
        }
    }

    /// Short tab label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            View::Ridership2023 => "2023 Ridership",
            View::Ridership2024 => "2024 Ridership",
            View::Comparison => "Comparison",
        }
    }

    /// Chart heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            View::Ridership2023 => "2023 Station Ridership by Season",
            View::Ridership2024 => "2024 Station Ridership by Season",
            View::Comparison => "Year-over-Year Comparison by Season",
        }
    }

    /// Field that labels the category axis.
    #[must_use]
    pub fn category_field(self) -> &'static str {
        match self {
            View::Ridership2023 | View::Ridership2024 => STATION_FIELD,
            View::Comparison => SEASON_FIELD,
        }
    }

    /// Fields plotted as series, in legend order.
    #[must_use]
    pub fn value_fields(self) -> Vec<&'static str> {
        match self {
            View::Ridership2023 | View::Ridership2024 => Season::ALL.iter().map(|s| s.name()).collect(),
            View::Comparison => COMPARISON_YEARS.to_vec(),
        }
    }

    /// The normalization rule for this view.
    #[must_use]
    pub fn rule(self) -> Rule {
        match self {
            View::Ridership2023 | View::Ridership2024 => {
                Rule::pass_through(std::iter::once(STATION_FIELD).chain(self.value_fields()))
            }
            View::Comparison => Rule::placeholder_rename(SEASON_FIELD, COMPARISON_YEARS),
        }
    }

    /// Normalize this view's sheet from a loaded table set.
    #[must_use]
    pub fn normalize(self, tables: &NamedTableSet) -> Vec<ChartSeriesRecord> {
        let rule = self.rule();
        normalize(tables.table(&self.sheet_name()), &rule).collect()
    }
}

/// A station's seasonal totals, as the single-year views plot them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StationSeasons {
    #[serde(rename = "Station", skip_serializing_if = "Option::is_none")]
    pub station: Option<CellValue>,
    #[serde(rename = "Winter", skip_serializing_if = "Option::is_none")]
    pub winter: Option<CellValue>,
    #[serde(rename = "Spring", skip_serializing_if = "Option::is_none")]
    pub spring: Option<CellValue>,
    #[serde(rename = "Summer", skip_serializing_if = "Option::is_none")]
    pub summer: Option<CellValue>,
    #[serde(rename = "Fall", skip_serializing_if = "Option::is_none")]
    pub fall: Option<CellValue>,
}

impl StationSeasons {
    #[must_use]
    pub fn from_record(record: &ChartSeriesRecord) -> Self {
        Self {
            station: record.get(STATION_FIELD).cloned(),
            winter: record.get(Season::Winter.name()).cloned(),
            spring: record.get(Season::Spring.name()).cloned(),
            summer: record.get(Season::Summer.name()).cloned(),
            fall: record.get(Season::Fall.name()).cloned(),
        }
    }

    /// Value for one season.
    #[must_use]
    pub fn season(&self, season: Season) -> Option<&CellValue> {
        match season {
            Season::Winter => self.winter.as_ref(),
            Season::Spring => self.spring.as_ref(),
            Season::Summer => self.summer.as_ref(),
            Season::Fall => self.fall.as_ref(),
        }
    }
}

/// One season's totals for both compared years.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<CellValue>,
    #[serde(rename = "2023", skip_serializing_if = "Option::is_none")]
    pub year_2023: Option<CellValue>,
    #[serde(rename = "2024", skip_serializing_if = "Option::is_none")]
    pub year_2024: Option<CellValue>,
}

impl SeasonComparison {
    #[must_use]
    pub fn from_record(record: &ChartSeriesRecord) -> Self {
        Self {
            season: record.get(SEASON_FIELD).cloned(),
            year_2023: record.get(COMPARISON_YEARS[0]).cloned(),
            year_2024: record.get(COMPARISON_YEARS[1]).cloned(),
        }
    }
}

/// The three record sequences handed to presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub ridership2023: Vec<ChartSeriesRecord>,
    pub ridership2024: Vec<ChartSeriesRecord>,
    pub comparison: Vec<ChartSeriesRecord>,
}

impl DashboardData {
    /// Normalize all views from one loaded snapshot.
    #[must_use]
    pub fn from_tables(tables: &NamedTableSet) -> Self {
        Self {
            ridership2023: View::Ridership2023.normalize(tables),
            ridership2024: View::Ridership2024.normalize(tables),
            comparison: View::Comparison.normalize(tables),
        }
    }

    #[must_use]
    pub fn records(&self, view: View) -> &[ChartSeriesRecord] {
        match view {
            View::Ridership2023 => &self.ridership2023,
            View::Ridership2024 => &self.ridership2024,
            View::Comparison => &self.comparison,
        }
    }

    /// Typed station records for a single-year view; empty for the comparison view.
    #[must_use]
    pub fn stations(&self, view: View) -> Vec<StationSeasons> {
        match view {
            View::Comparison => Vec::new(),
            _ => self.records(view).iter().map(StationSeasons::from_record).collect(),
        }
    }

    /// Typed comparison records.
    #[must_use]
    pub fn seasons(&self) -> Vec<SeasonComparison> {
        self.comparison.iter().map(SeasonComparison::from_record).collect()
    }

    /// True when no view has any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        View::ALL.iter().all(|v| self.records(*v).is_empty())
    }
}
