use chrono::{NaiveDate, NaiveDateTime};
use ridership_core::{placeholder_ordinal, CellValue, NamedTableSet};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use thiserror::Error;

/// Errors raised while writing a workbook.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("Sheet '{sheet}' is too large: {what} index {index} overflows the xlsx grid")]
    Overflow {
        sheet: String,
        what: &'static str,
        index: usize,
    },
}

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Save a table set as an xlsx file, one worksheet per table.
///
/// The header row is the union of row keys in first-seen order, except that
/// placeholder columns are put in ordinal order among themselves. They are
/// written as blank header cells, and a reload numbers blank headers left to
/// right, so a table whose placeholders run `__EMPTY`, `__EMPTY_1`, ... with
/// no gaps (as every loaded table's do) reloads with the same keys. Gaps close
/// up on reload.
///
/// # Errors
///
/// Returns error if a sheet is too large or the file cannot be written.
pub fn write_workbook<P: AsRef<Path>>(set: &NamedTableSet, path: P) -> Result<(), ExportError> {
    let mut workbook = build_workbook(set)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

/// Serialize a table set to xlsx bytes.
///
/// # Errors
///
/// Returns error if a sheet is too large or serialization fails.
pub fn workbook_to_bytes(set: &NamedTableSet) -> Result<Vec<u8>, ExportError> {
    let mut workbook = build_workbook(set)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(set: &NamedTableSet) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);

    for (name, table) in set.iter() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;

        let columns = header_order(table.column_keys());
        for (col_idx, key) in columns.iter().enumerate() {
            let col = col_index(name, col_idx)?;
            if placeholder_ordinal(key).is_none() {
                worksheet.write_string(0, col, *key)?;
            }
        }

        for (row_idx, row) in table.iter().enumerate() {
            let row_num = row_index(name, row_idx + 1)?;
            for (col_idx, key) in columns.iter().enumerate() {
                if let Some(value) = row.get(key) {
                    write_cell(worksheet, row_num, col_index(name, col_idx)?, value, &date_format)?;
                }
            }
        }
        tracing::debug!(sheet = %name, rows = table.len(), columns = columns.len(), "wrote sheet");
    }

    Ok(workbook)
}

/// Keep every column where it is, but refill the placeholder slots in
/// ordinal order.
fn header_order(mut columns: Vec<&str>) -> Vec<&str> {
    let mut placeholders: Vec<(usize, &str)> = columns
        .iter()
        .filter_map(|key| placeholder_ordinal(key).map(|n| (n, *key)))
        .collect();
    placeholders.sort_unstable();

    let mut sorted = placeholders.into_iter().map(|(_, key)| key);
    for slot in &mut columns {
        if placeholder_ordinal(slot).is_some() {
            if let Some(key) = sorted.next() {
                *slot = key;
            }
        }
    }
    columns
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    date_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b)?,
        // Note: Excel stores all numbers as f64, integers above 2^53 lose precision
        CellValue::Int(i) => worksheet.write_number(row, col, *i as f64)?,
        CellValue::Float(f) => worksheet.write_number(row, col, *f)?,
        CellValue::String(s) => worksheet.write_string(row, col, s)?,
        CellValue::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, excel_serial(dt), date_format)?
        }
    };
    Ok(())
}

/// Days since the 1899-12-30 epoch, the way spreadsheets store dates.
fn excel_serial(dt: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (*dt - epoch).num_milliseconds() as f64 / 86_400_000.0
}

fn row_index(sheet: &str, index: usize) -> Result<u32, ExportError> {
    u32::try_from(index).map_err(|_| ExportError::Overflow {
        sheet: sheet.to_string(),
        what: "row",
        index,
    })
}

fn col_index(sheet: &str, index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::Overflow {
        sheet: sheet.to_string(),
        what: "column",
        index,
    })
}
