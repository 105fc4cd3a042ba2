//! Cell-level coercion rules shared by the inferencer and the filter.

/// Parses a cell as a decimal floating-point literal.
///
/// Surrounding whitespace is ignored. Accepts an optional sign, digits, a
/// decimal point and an exponent. Anything else is rejected, including blank
/// input and the `inf`/`nan` spellings that `f64::from_str` would accept.
/// Literals that overflow to infinity (`1e999`) are not numbers either.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn is_null(cell: Option<&str>) -> bool {
    cell.is_none_or(str::is_empty)
}
