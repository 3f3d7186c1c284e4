//! # ridership-series
//!
//! Turns loosely typed sheet rows into the record shapes chart views expect.
//!
//! Normalization is pure and total: a [`Rule`] maps each [`Row`] of a
//! [`Table`] to one [`ChartSeriesRecord`], keeping row order, and a field
//! the row lacks becomes an explicit absence rather than an error.
//!
//! ```
//! use ridership_core::{Row, Table};
//! use ridership_series::{normalize, Rule};
//!
//! let table = Table::from_rows(vec![Row::new().with("Station", "Times Sq").with("Winter", 100)]);
//! let rule = Rule::pass_through(["Station", "Winter", "Spring"]);
//!
//! let records: Vec<_> = normalize(&table, &rule).collect();
//! assert_eq!(records.len(), 1);
//! assert!(records[0].is_absent("Spring"));
//! ```
//!
//! The crate also builds the seasonal workbook itself from raw hourly
//! ridership records (see [`SeasonalTotals`] and [`aggregate_csv`]).
//!
//! [`Row`]: ridership_core::Row
//! [`Table`]: ridership_core::Table

mod ingest;
mod record;
mod rule;
mod seasonal;
mod view;

/// Re-export CSV ingestion.
pub use ingest::{aggregate_csv, aggregate_csv_path, parse_timestamp, IngestError, TIMESTAMP_FORMAT};
/// Re-export the normalized record type.
pub use record::ChartSeriesRecord;
/// Re-export normalization rules.
pub use rule::{normalize, Normalized, Rule};
/// Re-export seasonal aggregation.
pub use seasonal::{year_sheet_name, RidershipSample, Season, SeasonalTotals, COMPARISON_SHEET};
/// Re-export dashboard views and their typed records.
pub use view::{DashboardData, SeasonComparison, StationSeasons, View};
