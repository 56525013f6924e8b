//! Heuristic wide-to-tall reshaper: locate the year header and the category
//! column inside a loosely structured grid, then pivot one-category-per-row /
//! one-year-per-column data into a year-indexed table.

pub mod category;
pub mod grid;
pub mod header;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ReshapeConfig;
pub use category::locate_category_column;
pub use grid::RawGrid;
pub use header::{extract_years, locate_header, HeaderLocation};

/// Structural failures; both are terminal for the whole reshape. Individual
/// bad cells are absorbed as [`CellWarning`]s instead and never abort.
#[derive(Debug, Error)]
pub enum ReshapeError {
    #[error("no header row found: {0}")]
    HeaderNotFound(String),
    #[error("no year columns found: {0}")]
    NoYearColumnsFound(String),
}

/// Year-indexed output table: year → (category → value). Every header year
/// is present; every non-blank category has a value for every year, with
/// defaulted cells resolved to 0.0 so downstream arithmetic never hits a
/// missing field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CleanTable {
    pub years: BTreeMap<i32, BTreeMap<String, f64>>,
}

impl CleanTable {
    pub fn categories(&self) -> Vec<&str> {
        self.years
            .values()
            .next()
            .map(|record| record.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn value(&self, year: i32, category: &str) -> Option<f64> {
        self.years.get(&year)?.get(category).copied()
    }

    /// Sum across categories for one year. Rows skipped for a blank category
    /// never contribute here.
    pub fn year_sum(&self, year: i32) -> f64 {
        self.years
            .get(&year)
            .map(|record| record.values().sum())
            .unwrap_or(0.0)
    }
}

/// A cell that was defaulted to 0.0 during extraction, kept so the consumer
/// can audit the substitutions without losing the no-abort contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellWarning {
    pub row: usize,
    pub column: usize,
    pub raw: String,
}

/// Result of a successful reshape: the table plus the defaulted-cell audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reshaped {
    pub table: CleanTable,
    pub warnings: Vec<CellWarning>,
}

/// Pivot rows below the header into the year-indexed table. Rows with a
/// blank category are skipped entirely; unparseable or missing cells become
/// 0.0 and are recorded as warnings.
pub fn extract_rows(
    g: &RawGrid,
    header: HeaderLocation,
    category_column: usize,
    year_columns: &[(i32, usize)],
) -> Reshaped {
    let mut years: BTreeMap<i32, BTreeMap<String, f64>> = year_columns
        .iter()
        .map(|&(year, _)| (year, BTreeMap::new()))
        .collect();
    let mut warnings = Vec::new();

    for row in (header.row + 1)..g.row_count() {
        let category = grid::normalize_token(g.cell(row, category_column));
        if category.is_empty() {
            continue;
        }
        for &(year, col) in year_columns {
            let raw = g.cell(row, col);
            let value = match grid::parse_number(raw) {
                Some(v) => v,
                None => {
                    warnings.push(CellWarning {
                        row,
                        column: col,
                        raw: raw.to_string(),
                    });
                    0.0
                }
            };
            // the entry API makes a repeated category overwrite deterministic
            years
                .get_mut(&year)
                .expect("year pre-populated above")
                .insert(category.clone(), value);
        }
    }

    Reshaped {
        table: CleanTable { years },
        warnings,
    }
}

/// Full pipeline: header scan, category-column selection, year extraction,
/// row pivot. Pure over the grid; two calls on the same grid produce
/// identical output.
#[instrument(level = "debug", skip(g, config), fields(rows = g.row_count()))]
pub fn reshape(g: &RawGrid, config: &ReshapeConfig) -> Result<Reshaped, ReshapeError> {
    let header = locate_header(g, config).ok_or_else(|| {
        ReshapeError::HeaderNotFound(format!(
            "no row contains both {} and {} within {}..={}",
            config.anchor_year, config.checkpoint_year, config.year_min, config.year_max
        ))
    })?;

    let category_column = locate_category_column(g, header, config);

    let year_columns = extract_years(g, header, config);
    if year_columns.is_empty() {
        return Err(ReshapeError::NoYearColumnsFound(format!(
            "header at row {} has no contiguous year columns from column {}",
            header.row, header.year_start_col
        )));
    }

    let reshaped = extract_rows(g, header, category_column, &year_columns);
    debug!(
        years = year_columns.len(),
        categories = reshaped.table.categories().len(),
        defaulted = reshaped.warnings.len(),
        "reshape complete"
    );
    Ok(reshaped)
}
