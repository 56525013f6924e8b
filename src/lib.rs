//! tallsheet — heuristic wide-to-tall reshaper for loosely structured
//! spreadsheet exports. Finds the year header row and the category column
//! inside an untyped grid, then pivots to a year-indexed, fully numeric
//! table ready for time-series charting.

pub mod cache;
pub mod config;
pub mod reshape;
pub mod source;

pub use cache::ReshapeCache;
pub use config::ReshapeConfig;
pub use reshape::{reshape, CleanTable, RawGrid, Reshaped, ReshapeError};
pub use source::{load_grid, locate_source, SourceError};
