//! Raw cell classification.

/// Tokens treated as an empty cell, compared case-insensitively after trimming.
pub const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "-"];

/// A raw cell is either missing or carries text to be converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCell<'a> {
    Missing,
    Text(&'a str),
}

/// Returns true when the cell holds no value.
pub fn is_missing_value(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

pub fn classify_cell(raw: &str) -> RawCell<'_> {
    if is_missing_value(raw) {
        RawCell::Missing
    } else {
        RawCell::Text(raw.trim())
    }
}
