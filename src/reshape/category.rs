// src/reshape/category.rs

use tracing::debug;

use super::grid::{normalize_token, parse_year, RawGrid};
use super::header::HeaderLocation;
use crate::config::ReshapeConfig;

/// Pick the column holding the row labels. One deterministic pipeline:
///
/// 1. keyword pass — first pre-year column whose header cell matches a
///    configured label token (substring, case-insensitive);
/// 2. exclusion pass — else the first pre-year column whose header cell is
///    non-empty and not itself a year token;
/// 3. positional fallback — else the configured default index, clamped into
///    the pre-year block.
///
/// Selection never fails; the fallback is best-effort policy, not an error.
pub fn locate_category_column(
    grid: &RawGrid,
    header: HeaderLocation,
    config: &ReshapeConfig,
) -> usize {
    // no pre-year block at all: the grid carries no label column, so row
    // labels are read from column 0 by convention
    if header.year_start_col == 0 {
        debug!("header starts at column 0, labels default to column 0");
        return 0;
    }

    let candidates = 0..header.year_start_col;

    for col in candidates.clone() {
        let token = normalize_token(grid.cell(header.row, col));
        if token.is_empty() {
            continue;
        }
        let token_lower = token.to_lowercase();
        if config
            .category_keywords
            .iter()
            .any(|kw| token_lower.contains(kw.to_lowercase().as_str()))
        {
            debug!(col, token, "category column via keyword");
            return col;
        }
    }

    for col in candidates {
        let token = normalize_token(grid.cell(header.row, col));
        if !token.is_empty() && parse_year(&token, config.year_min, config.year_max).is_none() {
            debug!(col, token, "category column via exclusion");
            return col;
        }
    }

    let fallback = config
        .fallback_category_column
        .min(header.year_start_col.saturating_sub(1));
    debug!(col = fallback, "category column via positional fallback");
    fallback
}
