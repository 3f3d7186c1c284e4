//! Header keys for sheet columns.
//!
//! A blank header cell has no text to key its column by, so it is assigned a
//! synthetic placeholder key. The convention matches the one spreadsheet
//! JSON exporters use: the first blank header becomes `__EMPTY`, the next
//! `__EMPTY_1`, then `__EMPTY_2`, and so on. Repeated header texts are
//! disambiguated with the same `_<n>` suffix scheme.
//!
//! This module is the only place that knows the placeholder token.

use std::collections::HashMap;

/// Key assigned to the first blank header cell of a sheet.
pub const PLACEHOLDER_KEY: &str = "__EMPTY";

/// Placeholder key for the `ordinal`-th blank header cell (0-based).
///
/// ```
/// use ridership_core::placeholder_key;
///
/// assert_eq!(placeholder_key(0), "__EMPTY");
/// assert_eq!(placeholder_key(2), "__EMPTY_2");
/// ```
#[must_use]
pub fn placeholder_key(ordinal: usize) -> String {
    if ordinal == 0 {
        PLACEHOLDER_KEY.to_string()
    } else {
        format!("{PLACEHOLDER_KEY}_{ordinal}")
    }
}

/// Ordinal of a placeholder key; `None` for any other key.
///
/// ```
/// use ridership_core::placeholder_ordinal;
///
/// assert_eq!(placeholder_ordinal("__EMPTY"), Some(0));
/// assert_eq!(placeholder_ordinal("__EMPTY_3"), Some(3));
/// assert_eq!(placeholder_ordinal("Station"), None);
/// ```
#[must_use]
pub fn placeholder_ordinal(key: &str) -> Option<usize> {
    match key.strip_prefix(PLACEHOLDER_KEY)? {
        "" => Some(0),
        rest => {
            let digits = rest.strip_prefix('_')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok().filter(|n| *n > 0)
        }
    }
}

/// Check whether a key was synthesized for a blank header cell.
#[must_use]
pub fn is_placeholder_key(key: &str) -> bool {
    placeholder_ordinal(key).is_some()
}

/// Assigns unique column keys to the cells of a header row, left to right.
#[derive(Debug, Default)]
pub struct HeaderKeys {
    counts: HashMap<String, usize>,
}

impl HeaderKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key for the next header cell. `None` or empty text means the cell was
    /// empty and gets a placeholder key; whitespace-only text is kept as is.
    pub fn assign(&mut self, text: Option<&str>) -> String {
        let base = match text {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => PLACEHOLDER_KEY.to_string(),
        };

        let Some(&counter) = self.counts.get(&base) else {
            self.counts.insert(base.clone(), 1);
            return base;
        };

        let mut counter = counter;
        let mut candidate = format!("{base}_{counter}");
        counter += 1;
        while self.counts.contains_key(&candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        self.counts.insert(base, counter);
        self.counts.insert(candidate.clone(), 1);
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_headers_get_numbered_placeholders() {
        let mut keys = HeaderKeys::new();
        assert_eq!(keys.assign(None), "__EMPTY");
        assert_eq!(keys.assign(Some("2023")), "2023");
        assert_eq!(keys.assign(Some("")), "__EMPTY_1");
        assert_eq!(keys.assign(None), "__EMPTY_2");
    }

    #[test]
    fn test_whitespace_header_is_not_blank() {
        let mut keys = HeaderKeys::new();
        assert_eq!(keys.assign(Some(" ")), " ");
        assert_eq!(keys.assign(None), "__EMPTY");
        assert_eq!(keys.assign(Some(" ")), " _1");
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let mut keys = HeaderKeys::new();
        assert_eq!(keys.assign(Some("Name")), "Name");
        assert_eq!(keys.assign(Some("Name_1")), "Name_1");
        assert_eq!(keys.assign(Some("Name")), "Name_2");
        assert_eq!(keys.assign(Some("Name")), "Name_3");
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder_key("__EMPTY"));
        assert!(is_placeholder_key("__EMPTY_12"));
        assert!(!is_placeholder_key("__EMPTY_"));
        assert!(!is_placeholder_key("__EMPTYx"));
        assert!(!is_placeholder_key("Station"));
        assert_eq!(placeholder_key(1), "__EMPTY_1");
    }

    #[test]
    fn test_placeholder_ordinal() {
        assert_eq!(placeholder_ordinal("__EMPTY"), Some(0));
        assert_eq!(placeholder_ordinal("__EMPTY_12"), Some(12));
        assert_eq!(placeholder_ordinal("__EMPTY_0"), None);
        assert_eq!(placeholder_ordinal("__EMPTY_1x"), None);
        for n in 0..5 {
            assert_eq!(placeholder_ordinal(&placeholder_key(n)), Some(n));
        }
    }
}
