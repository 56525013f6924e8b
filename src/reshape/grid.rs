// src/reshape/grid.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Spreadsheet exports turn integer years into floats, so a header cell
/// often arrives as "2023.0" instead of "2023".
static TRAILING_POINT_ZERO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+)\.0$").expect("pattern should parse"));

/// Grouped thousands: "1,234" / "1,234,567" / "1,234,567.89".
static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(,\d{3})+(\.\d+)?$").expect("pattern should parse"));

/// Untyped grid of cells as handed over by the source loader. Rows may be
/// ragged; out-of-range reads resolve to the empty string.
#[derive(Debug, Clone, Default)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }
}

/// Trim whitespace, strip outer quotes if present, and drop a trailing ".0"
/// artifact from numeric-looking tokens.
pub fn normalize_token(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    let unquoted = unquoted.trim();
    match TRAILING_POINT_ZERO.captures(unquoted) {
        Some(caps) => caps[1].to_string(),
        None => unquoted.to_string(),
    }
}

/// Parse a normalized token as a year within `[min, max]`.
pub fn parse_year(token: &str, min: i32, max: i32) -> Option<i32> {
    let year: i32 = token.parse().ok()?;
    (min..=max).contains(&year).then_some(year)
}

/// Lenient numeric coercion for data cells.
///
/// Grouping commas are stripped ("1,234,567" → 1234567.0); a single comma
/// that does not form 3-digit groups is a decimal comma ("90,5" → 90.5).
/// Returns `None` for empty or unparseable cells so the caller can apply
/// its default and record the substitution.
pub fn parse_number(raw: &str) -> Option<f64> {
    let token = normalize_token(raw);
    if token.is_empty() {
        return None;
    }
    let cleaned = if THOUSANDS.is_match(&token) {
        token.replace(',', "")
    } else if token.matches(',').count() == 1 && !token.contains('.') {
        token.replace(',', ".")
    } else {
        token
    };
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_float_artifact_and_quotes() {
        assert_eq!(normalize_token("2023.0"), "2023");
        assert_eq!(normalize_token(" \"2030\" "), "2030");
        assert_eq!(normalize_token("  구분 "), "구분");
        // a real decimal is not an artifact
        assert_eq!(normalize_token("20.05"), "20.05");
    }

    #[test]
    fn year_parsing_respects_range() {
        assert_eq!(parse_year("2023", 2000, 2100), Some(2023));
        assert_eq!(parse_year("1999", 2000, 2100), None);
        assert_eq!(parse_year("abc", 2000, 2100), None);
    }

    #[test]
    fn number_coercion_handles_separators() {
        assert_eq!(parse_number("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_number("90,5"), Some(90.5));
        assert_eq!(parse_number(" 80 "), Some(80.0));
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn ragged_grid_reads_empty() {
        let grid = RawGrid::new(vec![vec!["a".into()], vec![]]);
        assert_eq!(grid.cell(0, 0), "a");
        assert_eq!(grid.cell(0, 5), "");
        assert_eq!(grid.cell(9, 0), "");
    }
}
