use crate::record::ChartSeriesRecord;
use ridership_core::{Row, Table, PLACEHOLDER_KEY};

/// How a view maps a sheet row to its record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Copy the listed fields verbatim.
    PassThrough { fields: Vec<String> },
    /// Copy `from` under the name `to`, then copy `copy` verbatim.
    KeyRename {
        from: String,
        to: String,
        copy: Vec<String>,
    },
}

impl Rule {
    pub fn pass_through<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::PassThrough {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn key_rename<I, S>(from: impl Into<String>, to: impl Into<String>, copy: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::KeyRename {
            from: from.into(),
            to: to.into(),
            copy: copy.into_iter().map(Into::into).collect(),
        }
    }

    /// Rename the column whose header cell was blank.
    pub fn placeholder_rename<I, S>(to: impl Into<String>, copy: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::key_rename(PLACEHOLDER_KEY, to, copy)
    }

    /// Field names of the records this rule produces, in order.
    #[must_use]
    pub fn output_fields(&self) -> Vec<&str> {
        match self {
            Rule::PassThrough { fields } => fields.iter().map(String::as_str).collect(),
            Rule::KeyRename { to, copy, .. } => std::iter::once(to.as_str())
                .chain(copy.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Map one row. Never fails: missing cells become absent fields.
    #[must_use]
    pub fn apply(&self, row: &Row) -> ChartSeriesRecord {
        match self {
            Rule::PassThrough { fields } => fields
                .iter()
                .map(|field| (field.as_str(), row.get(field).cloned()))
                .collect(),
            Rule::KeyRename { from, to, copy } => std::iter::once((to.as_str(), row.get(from).cloned()))
                .chain(copy.iter().map(|field| (field.as_str(), row.get(field).cloned())))
                .collect(),
        }
    }
}

/// Lazy sequence of normalized records, one per table row.
#[derive(Debug, Clone)]
pub struct Normalized<'a> {
    rows: std::slice::Iter<'a, Row>,
    rule: &'a Rule,
}

impl Iterator for Normalized<'_> {
    type Item = ChartSeriesRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|row| self.rule.apply(row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Normalized<'_> {}

/// Normalize every row of `table` with `rule`, preserving row order.
pub fn normalize<'a>(table: &'a Table, rule: &'a Rule) -> Normalized<'a> {
    Normalized {
        rows: table.rows().iter(),
        rule,
    }
}
