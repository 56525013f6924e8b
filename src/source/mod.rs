//! Source boundary: find a candidate export in a directory, decode it, and
//! parse it into a [`RawGrid`] with no header assumption. The reshaper never
//! touches the filesystem itself.

pub mod decode;
pub mod locate;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::reshape::RawGrid;
pub use decode::decode;
pub use locate::locate_source;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no candidate source file in {dir}")]
    NoCandidate { dir: PathBuf },
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

const DELIMITER_CANDIDATES: &[u8] = b",;\t";

/// Pick the delimiter whose field counts are most consistent across the
/// first rows, field count breaking ties. Mirrors how spreadsheet importers
/// sniff regional CSV flavors (`;` for comma-decimal locales).
fn sniff_delimiter(text: &str) -> u8 {
    let sample: Vec<&str> = text.lines().take(10).filter(|l| !l.is_empty()).collect();
    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in DELIMITER_CANDIDATES {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| line.split(delim as char).count())
            .collect();
        let Some(&target) = counts.first() else {
            continue;
        };
        if target < 2 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// Parse already-decoded text into a grid, keeping every row and cell as-is.
pub fn grid_from_text(text: &str, path: &Path) -> Result<RawGrid, SourceError> {
    let delimiter = sniff_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| SourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    debug!(rows = rows.len(), delimiter = %(delimiter as char), "grid parsed");
    Ok(RawGrid::new(rows))
}

/// Read, decode and parse one source file.
#[instrument(level = "info", fields(path = %path.as_ref().display()))]
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<RawGrid, SourceError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    grid_from_text(&decode(bytes), path)
}
