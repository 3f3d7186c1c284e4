//! Reads raw hourly ridership exports (CSV) into seasonal totals.

use crate::seasonal::{RidershipSample, SeasonalTotals};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp layout of the ridership export, e.g. `01/31/2023 11:00:00 PM`.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

const TIMESTAMP_COLUMN: &str = "transit_timestamp";
const STATION_COLUMN: &str = "station_complex";
const RIDERSHIP_COLUMN: &str = "ridership";

/// Errors raised while reading ridership exports.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Required column not found: {column}")]
    MissingColumn { column: String },

    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse an export timestamp. The export format is tried first, then ISO
/// forms.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_ridership(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn column_index(headers: &csv::StringRecord, column: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
        })
}

/// Stream a ridership CSV into seasonal totals.
///
/// Rows with an unparseable timestamp or ridership are skipped and logged;
/// a missing required column fails the whole read.
///
/// # Errors
///
/// Returns error if a required column is missing or the CSV is malformed.
pub fn aggregate_csv<R: Read>(reader: R) -> Result<SeasonalTotals, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let ts_idx = column_index(&headers, TIMESTAMP_COLUMN)?;
    let station_idx = column_index(&headers, STATION_COLUMN)?;
    let ridership_idx = column_index(&headers, RIDERSHIP_COLUMN)?;

    let mut totals = SeasonalTotals::new();
    let mut accepted = 0usize;
    let mut skipped = 0usize;

    for (line, record) in csv_reader.records().enumerate() {
        let record = record?;
        let timestamp = record.get(ts_idx).and_then(parse_timestamp);
        let station = record.get(station_idx).map(str::trim).filter(|s| !s.is_empty());
        let ridership = record.get(ridership_idx).and_then(parse_ridership);

        match (timestamp, station, ridership) {
            (Some(timestamp), Some(station), Some(ridership)) => {
                totals.add(&RidershipSample {
                    timestamp,
                    station: station.to_string(),
                    ridership,
                });
                accepted += 1;
            }
            _ => {
                // +2: one for the header, one for 1-based lines
                tracing::warn!(line = line + 2, "skipping unparseable ridership row");
                skipped += 1;
            }
        }
    }

    tracing::info!(accepted, skipped, years = ?totals.years(), "aggregated ridership export");
    Ok(totals)
}

/// [`aggregate_csv`] over a file.
///
/// # Errors
///
/// Returns error if the file cannot be opened or [`aggregate_csv`] fails.
pub fn aggregate_csv_path<P: AsRef<Path>>(path: P) -> Result<SeasonalTotals, IngestError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    aggregate_csv(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_export_timestamp() {
        let ts = parse_timestamp("01/31/2023 11:00:00 PM").unwrap();
        assert_eq!(ts.hour(), 23);
        assert!(parse_timestamp("2024-06-01T12:00:00").is_some());
        assert!(parse_timestamp("2024-06-01").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_parse_ridership() {
        assert_eq!(parse_ridership("1,234"), Some(1234.0));
        assert_eq!(parse_ridership(" 7.5 "), Some(7.5));
        assert_eq!(parse_ridership("n/a"), None);
        assert_eq!(parse_ridership("NaN"), None);
    }

    #[test]
    fn test_aggregate_skips_bad_rows() {
        let csv = "\
transit_timestamp,station_complex,ridership,extra
01/15/2023 08:00:00 AM,Times Sq,100,x
garbage,Times Sq,5,x
07/04/2023 05:00:00 PM,Times Sq,40,x
07/04/2023 05:00:00 PM,,40,x
";
        let totals = aggregate_csv(csv.as_bytes()).unwrap();
        let table = totals.station_table(2023, None);

        assert_eq!(table.len(), 1);
        let row = table.get(0).unwrap();
        assert_eq!(row.get("Winter").and_then(|v| v.as_float()), Some(100.0));
        assert_eq!(row.get("Summer").and_then(|v| v.as_float()), Some(40.0));
    }

    #[test]
    fn test_missing_column() {
        let csv = "transit_timestamp,station,ridership\n";
        let result = aggregate_csv(csv.as_bytes());
        assert!(matches!(
            result,
            Err(IngestError::MissingColumn { column }) if column == "station_complex"
        ));
    }
}
