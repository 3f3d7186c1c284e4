use ridership_core::CellValue;

/// Format a number with comma thousands separators and at most three
/// fraction digits, e.g. `1234567.5` becomes `1,234,567.5`.
#[must_use]
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{value:.3}");
    let fixed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    if int_part == "0" && frac_part.is_none() {
        return "0".to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Display text for a cell; numbers get thousands separators.
#[must_use]
pub fn format_cell(value: &CellValue) -> String {
    match value.as_float() {
        Some(n) => format_thousands(n),
        None => value.to_string(),
    }
}
