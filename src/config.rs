// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tuning knobs for header detection, category-column selection and source
/// discovery. Defaults reproduce the behavior observed in the dashboard
/// exports this crate was built for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeConfig {
    /// Plausible year range; tokens outside it never count as year columns.
    pub year_min: i32,
    pub year_max: i32,
    /// Both anchors must appear in a row before it is accepted as the header.
    /// A single coincidental number must not trigger a false positive.
    pub anchor_year: i32,
    pub checkpoint_year: i32,
    /// Label tokens tried first when picking the category column.
    pub category_keywords: Vec<String>,
    /// Positional fallback when no candidate column qualifies.
    pub fallback_category_column: usize,
    /// Source discovery: exact filename, then extension filter, then a probe
    /// token searched in the first rows of each candidate.
    pub expected_file: String,
    pub extension: String,
    pub probe_token: String,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            year_min: 2000,
            year_max: 2100,
            anchor_year: 2023,
            checkpoint_year: 2030,
            category_keywords: vec![
                "구분".to_string(),
                "분류".to_string(),
                "항목".to_string(),
                "category".to_string(),
            ],
            fallback_category_column: 1,
            expected_file: "data.csv".to_string(),
            extension: "csv".to_string(),
            probe_token: "2023".to_string(),
        }
    }
}

impl ReshapeConfig {
    /// Load overrides from a YAML file; a missing file yields the defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}
