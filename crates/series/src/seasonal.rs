//! Seasonal ridership totals, the source of the dashboard workbook.
//!
//! Hourly ridership samples are summed per station, per year and per
//! season. Each year becomes a `Ridership_<year>` table of the busiest
//! stations, and a `Comparison` table holds the all-station seasonal totals
//! of every year side by side.

use chrono::{Datelike, NaiveDateTime};
use ridership_core::{CellValue, NamedTableSet, Row, Table, PLACEHOLDER_KEY};
use std::collections::{BTreeMap, HashMap};

/// Name of the year-over-year sheet.
pub const COMPARISON_SHEET: &str = "Comparison";

/// Sheet name for one year's station table.
#[must_use]
pub fn year_sheet_name(year: i32) -> String {
    format!("Ridership_{year}")
}

/// Meteorological season of a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Seasons in chart order.
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Season of a 1-based month; `None` outside 1..=12.
    #[must_use]
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// One hourly ridership observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RidershipSample {
    pub timestamp: NaiveDateTime,
    pub station: String,
    pub ridership: f64,
}

/// Running totals per year, station and season.
#[derive(Debug, Clone, Default)]
pub struct SeasonalTotals {
    by_year: BTreeMap<i32, HashMap<String, [f64; 4]>>,
}

impl SeasonalTotals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sample: &RidershipSample) {
        // `from_month` only fails for months chrono never produces
        let Some(season) = Season::from_month(sample.timestamp.month()) else {
            return;
        };
        let stations = self.by_year.entry(sample.timestamp.year()).or_default();
        let totals = stations.entry(sample.station.clone()).or_insert([0.0; 4]);
        totals[season.index()] += sample.ridership;
    }

    /// Years with at least one sample, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        self.by_year.keys().copied().collect()
    }

    /// Number of distinct stations seen in `year`.
    #[must_use]
    pub fn station_count(&self, year: i32) -> usize {
        self.by_year.get(&year).map_or(0, HashMap::len)
    }

    /// Stations of `year` by annual total, busiest first, optionally cut to
    /// the `top_n` busiest. `None` or `Some(0)` keeps every station.
    ///
    /// Ties are broken by station name so the output is deterministic.
    #[must_use]
    pub fn station_table(&self, year: i32, top_n: Option<usize>) -> Table {
        let Some(stations) = self.by_year.get(&year) else {
            return Table::new();
        };

        let mut ranked: Vec<(&String, &[f64; 4])> = stations.iter().collect();
        ranked.sort_by(|(a_name, a), (b_name, b)| {
            let a_total: f64 = a.iter().sum();
            let b_total: f64 = b.iter().sum();
            b_total.total_cmp(&a_total).then_with(|| a_name.cmp(b_name))
        });

        ranked
            .into_iter()
            .take(top_n.filter(|n| *n > 0).unwrap_or(usize::MAX))
            .map(|(station, totals)| {
                let mut row = Row::new().with("Station", station.as_str());
                for season in Season::ALL {
                    row.insert(season.name(), number_cell(totals[season.index()]));
                }
                row
            })
            .collect()
    }

    /// All-station totals per season, one column per year.
    ///
    /// The season sits under the placeholder key, matching a sheet whose
    /// season column has no header.
    #[must_use]
    pub fn comparison_table(&self, years: &[i32]) -> Table {
        Season::ALL
            .iter()
            .map(|season| {
                let mut row = Row::new().with(PLACEHOLDER_KEY, season.name());
                for year in years {
                    let total: f64 = self
                        .by_year
                        .get(year)
                        .map(|stations| stations.values().map(|t| t[season.index()]).sum())
                        .unwrap_or(0.0);
                    row.insert(year.to_string(), number_cell(total));
                }
                row
            })
            .collect()
    }

    /// The dashboard workbook: one station table per year, then the comparison.
    #[must_use]
    pub fn to_table_set(&self, years: &[i32], top_n: Option<usize>) -> NamedTableSet {
        let mut tables: Vec<(String, Table)> = years
            .iter()
            .map(|year| (year_sheet_name(*year), self.station_table(*year, top_n)))
            .collect();
        tables.push((COMPARISON_SHEET.to_string(), self.comparison_table(years)));
        NamedTableSet::new(tables)
    }
}

impl Extend<RidershipSample> for SeasonalTotals {
    fn extend<I: IntoIterator<Item = RidershipSample>>(&mut self, iter: I) {
        for sample in iter {
            self.add(&sample);
        }
    }
}

impl FromIterator<RidershipSample> for SeasonalTotals {
    fn from_iter<I: IntoIterator<Item = RidershipSample>>(iter: I) -> Self {
        let mut totals = Self::new();
        totals.extend(iter);
        totals
    }
}

/// Whole totals are stored as integers.
fn number_cell(value: f64) -> CellValue {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}
