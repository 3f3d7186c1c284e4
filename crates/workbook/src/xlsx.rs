use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use ridership_core::{CellValue, HeaderKeys, LoadPolicy, NamedTableSet, Row, SkippedSheet, Table};
use std::io::Cursor;
use thiserror::Error;

/// Errors raised while parsing workbook bytes.
#[derive(Error, Debug)]
pub enum WorkbookError {
    #[error("not a readable workbook: {0}")]
    Open(String),

    #[error("sheet '{name}' could not be read: {message}")]
    Sheet { name: String, message: String },
}

/// Options for parsing a workbook
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Only parse these sheets; `None` parses every sheet.
    pub sheets: Option<Vec<String>>,
    /// What to do when a single sheet fails to parse
    pub policy: LoadPolicy,
}

impl ReadOptions {
    /// Restrict parsing to the named sheets. Names missing from the workbook
    /// are ignored.
    #[must_use]
    pub fn with_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = Some(sheets.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn wants(&self, sheet_name: &str) -> bool {
        self.sheets
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == sheet_name))
    }
}

/// Convert a calamine cell to a value; empty cells have none.
fn data_to_cell_value(data: &Data) -> Option<CellValue> {
    match data {
        Data::Empty => None,
        Data::Bool(b) => Some(CellValue::Bool(*b)),
        Data::Int(i) => Some(CellValue::Int(*i)),
        Data::Float(f) => Some(CellValue::Float(*f)),
        Data::String(s) => Some(CellValue::String(s.clone())),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Float(dt.as_f64())),
        ),
        Data::DateTimeIso(s) => Some(parse_iso_datetime(s).map_or_else(|| CellValue::String(s.clone()), CellValue::DateTime)),
        Data::DurationIso(s) => Some(CellValue::String(s.clone())),
        Data::Error(e) => Some(CellValue::String(e.to_string())),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Turn a sheet range into rows keyed by the first row's header text.
fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Table::new();
    };

    let mut keys = HeaderKeys::new();
    let columns: Vec<String> = header
        .iter()
        .map(|cell| {
            let text = data_to_cell_value(cell).map(|v| v.to_string());
            keys.assign(text.as_deref())
        })
        .collect();

    rows.filter_map(|cells| {
        let row: Row = columns
            .iter()
            .zip(cells)
            .filter_map(|(key, cell)| data_to_cell_value(cell).map(|v| (key.as_str(), v)))
            .collect();
        // Blank rows are dropped
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

/// Parse workbook bytes (xlsx, xlsm, xlsb, xls or ods) into a table set.
///
/// Under [`LoadPolicy::AllOrNothing`] the first failing sheet fails the
/// whole parse. Under [`LoadPolicy::PerSheet`] failing sheets are left out
/// and listed on the result.
///
/// # Errors
///
/// Returns error if the bytes are not a workbook, or a sheet cannot be read
/// under the all-or-nothing policy.
pub fn parse_workbook(bytes: Vec<u8>, options: &ReadOptions) -> Result<NamedTableSet, WorkbookError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| WorkbookError::Open(e.to_string()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().iter().map(|s| s.to_string()).collect();
    let mut tables = Vec::with_capacity(sheet_names.len());
    let mut skipped = Vec::new();

    for sheet_name in sheet_names {
        if !options.wants(&sheet_name) {
            continue;
        }

        match workbook.worksheet_range(&sheet_name) {
            Ok(range) => {
                let table = range_to_table(&range);
                tracing::debug!(sheet = %sheet_name, rows = table.len(), "parsed sheet");
                tables.push((sheet_name, table));
            }
            Err(e) => match options.policy {
                LoadPolicy::AllOrNothing => {
                    return Err(WorkbookError::Sheet {
                        name: sheet_name,
                        message: e.to_string(),
                    });
                }
                LoadPolicy::PerSheet => {
                    tracing::warn!(sheet = %sheet_name, error = %e, "skipping unreadable sheet");
                    skipped.push(SkippedSheet {
                        name: sheet_name,
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    Ok(NamedTableSet::new(tables).with_skipped(skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use ridership_core::PLACEHOLDER_KEY;

    fn range_of(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    #[test]
    fn test_header_row_keys_rows() {
        let range = range_of(vec![
            vec![s("Station"), s("Winter"), s("Spring")],
            vec![s("Times Sq"), Data::Float(100.0), Data::Float(120.0)],
            vec![s("Union Sq"), Data::Float(80.0), Data::Float(95.0)],
        ]);

        let table = range_to_table(&range);

        assert_eq!(table.len(), 2);
        let first = table.get(0).unwrap();
        assert_eq!(first.get("Station"), Some(&CellValue::from("Times Sq")));
        assert_eq!(first.get("Spring"), Some(&CellValue::Float(120.0)));
    }

    #[test]
    fn test_blank_header_gets_placeholder() {
        let range = range_of(vec![
            vec![Data::Empty, Data::Float(2023.0), Data::Float(2024.0)],
            vec![s("Winter"), Data::Float(100.0), Data::Float(90.0)],
        ]);

        let table = range_to_table(&range);
        let row = table.get(0).unwrap();

        assert_eq!(row.get(PLACEHOLDER_KEY), Some(&CellValue::from("Winter")));
        assert_eq!(row.get("2023"), Some(&CellValue::Float(100.0)));
        assert_eq!(row.get("2024"), Some(&CellValue::Float(90.0)));
    }

    #[test]
    fn test_whitespace_header_keeps_its_text() {
        let range = range_of(vec![
            vec![s(" "), Data::Empty],
            vec![s("Winter"), s("Spring")],
        ]);

        let table = range_to_table(&range);
        let row = table.get(0).unwrap();

        assert_eq!(row.get(" "), Some(&CellValue::from("Winter")));
        assert_eq!(row.get(PLACEHOLDER_KEY), Some(&CellValue::from("Spring")));
    }

    #[test]
    fn test_empty_cells_are_absent_and_blank_rows_skipped() {
        let range = range_of(vec![
            vec![s("Station"), s("Winter"), s("Fall")],
            vec![s("A"), Data::Empty, Data::Int(3)],
            vec![Data::Empty, Data::Empty, Data::Empty],
            vec![s("B"), Data::Int(1), Data::Empty],
        ]);

        let table = range_to_table(&range);

        assert_eq!(table.len(), 2);
        assert!(!table.get(0).unwrap().contains_key("Winter"));
        assert!(!table.get(1).unwrap().contains_key("Fall"));
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        let range = range_of(vec![vec![s("Station"), s("Winter")]]);
        assert!(range_to_table(&range).is_empty());
        assert!(range_to_table(&Range::empty()).is_empty());
    }

    #[test]
    fn test_error_cells_keep_error_text() {
        assert_eq!(
            data_to_cell_value(&Data::Error(CellErrorType::Div0)),
            Some(CellValue::from("#DIV/0!"))
        );
    }

    #[test]
    fn test_iso_datetime_cells() {
        let value = data_to_cell_value(&Data::DateTimeIso("2024-06-01T12:00:00".to_string()));
        assert!(matches!(value, Some(CellValue::DateTime(_))));

        let value = data_to_cell_value(&Data::DateTimeIso("not a date".to_string()));
        assert_eq!(value, Some(CellValue::from("not a date")));
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let result = parse_workbook(b"definitely not a workbook".to_vec(), &ReadOptions::default());
        assert!(matches!(result, Err(WorkbookError::Open(_))));
    }

    #[test]
    fn test_read_options_filter() {
        let options = ReadOptions::default().with_sheets(["Comparison"]);
        assert!(options.wants("Comparison"));
        assert!(!options.wants("Ridership_2023"));
        assert!(ReadOptions::default().wants("anything"));
    }
}
