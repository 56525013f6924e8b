use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use tallsheet::{cache::ReshapeCache, config::ReshapeConfig, source};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    // ─── 2) resolve data dir & config ────────────────────────────────
    let mut args = env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    let config_path =
        PathBuf::from(env::var("TALLSHEET_CONFIG").unwrap_or_else(|_| "tallsheet.yaml".into()));
    let config = ReshapeConfig::from_yaml_file(&config_path)?;

    // ─── 3) locate & load the source ─────────────────────────────────
    let source_path = source::locate_source(&data_dir, &config)
        .with_context(|| format!("locating a source under {}", data_dir.display()))?;
    info!(path = %source_path.display(), "source selected");

    let bytes = std::fs::read(&source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;

    // ─── 4) reshape (memoized by content fingerprint) ────────────────
    let cache = ReshapeCache::new();
    let reshaped = cache
        .get_or_reshape(&bytes, &config, || {
            let grid = source::grid_from_text(&source::decode(bytes.clone()), &source_path)?;
            info!(rows = grid.row_count(), "grid loaded");
            Ok(grid)
        })
        .with_context(|| format!("reshaping {}", source_path.display()))?;

    for w in &reshaped.warnings {
        warn!(row = w.row, column = w.column, raw = %w.raw, "cell defaulted to 0.0");
    }
    info!(
        years = reshaped.table.years.len(),
        categories = reshaped.table.categories().len(),
        defaulted = reshaped.warnings.len(),
        "reshape complete"
    );

    // ─── 5) emit the tall table ──────────────────────────────────────
    println!("{}", serde_json::to_string_pretty(&reshaped.table)?);
    Ok(())
}
