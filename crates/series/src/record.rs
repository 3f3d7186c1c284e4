use indexmap::IndexMap;
use ridership_core::CellValue;
use serde::{Serialize, Serializer};

/// One normalized record for a chart view.
///
/// Each field holds either a value or an explicit absence marker (`None`).
/// Absent fields are left out when the record is serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeriesRecord {
    fields: IndexMap<String, Option<CellValue>>,
}

impl ChartSeriesRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, present or absent.
    pub fn set(&mut self, field: impl Into<String>, value: Option<CellValue>) {
        self.fields.insert(field.into(), value);
    }

    /// Value of `field`; `None` when the field is absent or unknown.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&CellValue> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    /// True when the record declares `field` but has no value for it.
    #[must_use]
    pub fn is_absent(&self, field: &str) -> bool {
        matches!(self.fields.get(field), Some(None))
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in output order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&CellValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<CellValue>)> for ChartSeriesRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<CellValue>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Serialize for ChartSeriesRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.fields
                .iter()
                .filter_map(|(k, v)| v.as_ref().map(|v| (k, v))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_unknown() {
        let mut record = ChartSeriesRecord::new();
        record.set("Station", Some(CellValue::from("A")));
        record.set("Winter", None);

        assert!(record.is_absent("Winter"));
        assert!(!record.is_absent("Summer"));
        assert!(!record.has_field("Summer"));
        assert_eq!(record.get("Winter"), None);
    }

    #[test]
    fn test_serialize_skips_absent() {
        let record: ChartSeriesRecord = [
            ("season", Some(CellValue::from("Winter"))),
            ("2023", Some(CellValue::Int(100))),
            ("2024", None),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"season":"Winter","2023":100}"#);
    }
}
