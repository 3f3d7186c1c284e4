//! Rows, tables and the set of named tables produced by one load.

use crate::value::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One data row of a sheet, keyed by column header.
///
/// Rows of the same table need not share keys: a cell left empty in the
/// sheet is simply absent here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell value under `key`, or `None` when the row has no such cell.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Set a cell, returning the previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Option<CellValue> {
        self.cells.insert(key.into(), value.into())
    }

    /// Builder-style [`Row::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Column keys in the order they were read.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// The data rows of one sheet, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

static EMPTY_TABLE: Table = Table { rows: Vec::new() };

impl Table {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Shared empty table, returned for sheets that are not present.
    #[must_use]
    pub fn empty() -> &'static Table {
        &EMPTY_TABLE
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Every column key used by any row, in first-seen order.
    #[must_use]
    pub fn column_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }
}

impl FromIterator<Row> for Table {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Table {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// A sheet that was left out of a load because it failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSheet {
    pub name: String,
    pub message: String,
}

/// Every table produced by one workbook load, keyed by sheet name.
///
/// The set is immutable once built; a new load produces a new set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedTableSet {
    tables: IndexMap<String, Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedSheet>,
}

impl NamedTableSet {
    /// Build a set from `(sheet name, table)` pairs in workbook order.
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (S, Table)>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(|(name, t)| (name.into(), t)).collect(),
            skipped: Vec::new(),
        }
    }

    /// Attach the sheets that were skipped while loading.
    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<SkippedSheet>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Table for `name`; an absent sheet yields the shared empty table.
    #[must_use]
    pub fn table(&self, name: &str) -> &Table {
        self.tables.get(name).unwrap_or_else(|| Table::empty())
    }

    /// Table for `name`, distinguishing absence.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Sheet names in workbook order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sheets that failed to parse under a per-sheet load policy.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedSheet] {
        &self.skipped
    }

    /// Total data rows across all tables.
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }
}
