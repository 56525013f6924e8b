// src/source/locate.rs

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, instrument, warn};

use super::{decode::decode, SourceError};
use crate::config::ReshapeConfig;

/// How many leading rows to sniff when probing a candidate for the token.
const PROBE_ROWS: usize = 5;

/// Discovery policy over a directory of candidate files, in order:
///
/// 1. a file named exactly `expected_file`;
/// 2. else the first file (sorted) with the configured extension;
/// 3. else the first file whose first rows contain `probe_token`.
#[instrument(level = "debug", skip(config), fields(dir = %dir.as_ref().display()))]
pub fn locate_source<P: AsRef<Path>>(
    dir: P,
    config: &ReshapeConfig,
) -> Result<PathBuf, SourceError> {
    let dir = dir.as_ref();

    let exact = dir.join(&config.expected_file);
    if exact.is_file() {
        debug!(path = %exact.display(), "exact-name match");
        return Ok(exact);
    }

    let candidates = list_files(dir)?;

    if let Some(path) = candidates.iter().find(|p| {
        p.extension()
            .map(|ext| ext.eq_ignore_ascii_case(&config.extension))
            .unwrap_or(false)
    }) {
        debug!(path = %path.display(), "extension match");
        return Ok(path.clone());
    }

    for path in &candidates {
        if probe_contains(path, &config.probe_token) {
            debug!(path = %path.display(), token = %config.probe_token, "probe match");
            return Ok(path.clone());
        }
    }

    Err(SourceError::NoCandidate {
        dir: dir.to_path_buf(),
    })
}

/// Sorted file listing so selection is deterministic across runs.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let pattern = format!("{}/*", dir.display());
    let entries = glob(&pattern).map_err(|e| SourceError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(p) if p.is_file() => Some(p),
            Ok(_) => None,
            Err(e) => {
                warn!("unreadable dir entry: {e}");
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Read at most the first few rows of a candidate and search for the token.
/// Unreadable candidates are skipped, not fatal.
fn probe_contains(path: &Path, token: &str) -> bool {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            warn!(path = %path.display(), "probe read failed: {e}");
            return false;
        }
    };
    decode(bytes)
        .lines()
        .take(PROBE_ROWS)
        .any(|line| line.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[test]
    fn exact_name_wins_over_other_csvs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("aaa.csv"), "x")?;
        fs::write(dir.path().join("data.csv"), "y")?;
        let found = locate_source(dir.path(), &ReshapeConfig::default())?;
        assert_eq!(found, dir.path().join("data.csv"));
        Ok(())
    }

    #[test]
    fn first_sorted_csv_when_no_exact_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("zzz.csv"), "x")?;
        fs::write(dir.path().join("bbb.csv"), "y")?;
        fs::write(dir.path().join("readme.txt"), "z")?;
        let found = locate_source(dir.path(), &ReshapeConfig::default())?;
        assert_eq!(found, dir.path().join("bbb.csv"));
        Ok(())
    }

    #[test]
    fn probe_token_rescues_misnamed_exports() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("notes.txt"), "nothing here")?;
        fs::write(dir.path().join("export.dat"), "구분,2023,2030\n목표,1,2\n")?;
        let found = locate_source(dir.path(), &ReshapeConfig::default())?;
        assert_eq!(found, dir.path().join("export.dat"));
        Ok(())
    }

    #[test]
    fn empty_dir_yields_no_candidate() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let err = locate_source(dir.path(), &ReshapeConfig::default()).unwrap_err();
        assert!(matches!(err, SourceError::NoCandidate { .. }));
        Ok(())
    }
}
