// src/reshape/header.rs

use tracing::{debug, trace};

use super::grid::{normalize_token, parse_year, RawGrid};
use crate::config::ReshapeConfig;

/// Where the year header lives inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    /// Row holding the year tokens.
    pub row: usize,
    /// Column of the first in-range year token in that row.
    pub year_start_col: usize,
}

/// Scan rows top-to-bottom for the header. A row qualifies only when both
/// anchor years are present as in-range tokens; at least two distinct years
/// follow from that, so a lone stray number never matches. First hit wins.
///
/// The start column is the beginning of the contiguous year run holding the
/// anchor, found by walking left from it. A stray numeric cell earlier in
/// the row (an ID, a total) must not hijack the run start and shift the
/// whole extraction onto columns the anchors never justified.
pub fn locate_header(grid: &RawGrid, config: &ReshapeConfig) -> Option<HeaderLocation> {
    for (row_idx, row) in grid.rows.iter().enumerate() {
        let years: Vec<Option<i32>> = row
            .iter()
            .map(|cell| parse_year(&normalize_token(cell), config.year_min, config.year_max))
            .collect();

        let anchor_col = years.iter().position(|&y| y == Some(config.anchor_year));
        let saw_checkpoint = years.iter().any(|&y| y == Some(config.checkpoint_year));

        if let (Some(anchor_col), true) = (anchor_col, saw_checkpoint) {
            let mut year_start_col = anchor_col;
            while year_start_col > 0 && years[year_start_col - 1].is_some() {
                year_start_col -= 1;
            }
            debug!(row = row_idx, year_start_col, "header located");
            return Some(HeaderLocation {
                row: row_idx,
                year_start_col,
            });
        }
        trace!(row = row_idx, "not a header row");
    }
    None
}

/// Walk right from the header's first year column, accepting contiguous
/// in-range year tokens. The first non-year token (empty included) ends the
/// scan; gaps are not skipped over, so unrelated trailing columns cannot be
/// pulled in. On a duplicate year the later column wins.
pub fn extract_years(
    grid: &RawGrid,
    header: HeaderLocation,
    config: &ReshapeConfig,
) -> Vec<(i32, usize)> {
    let mut years: Vec<(i32, usize)> = Vec::new();
    let width = grid.col_count(header.row);

    for col in header.year_start_col..width {
        let token = normalize_token(grid.cell(header.row, col));
        match parse_year(&token, config.year_min, config.year_max) {
            Some(year) => {
                if let Some(slot) = years.iter_mut().find(|(y, _)| *y == year) {
                    slot.1 = col;
                } else {
                    years.push((year, col));
                }
            }
            None => break,
        }
    }

    debug!(count = years.len(), "year columns extracted");
    years
}
