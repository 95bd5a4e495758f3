//! Loads the latest snapshot into the warehouse table, independently of the
//! transformation run that produced it.
//!
//! Run with: cargo run --bin load_warehouse -- [--config path] [--snapshot path]

use anyhow::{Context, Result};
use housing_pipeline::config;
use housing_pipeline::warehouse::WarehouseLoader;
use std::env;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    housing_pipeline::init_tracing();

    let args: Vec<String> = env::args().collect();
    let config_path = config::config_path_from_args(&args);

    let mut config = config::load_or_default(config_path)
        .with_context(|| format!("Failed to load pipeline configuration from {}", config_path))?;

    config
        .warehouse
        .load_credentials()
        .context("Failed to load warehouse credentials")?;

    let snapshot_path = args
        .iter()
        .position(|arg| arg == "--snapshot")
        .and_then(|index| args.get(index + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| config.snapshot.path.clone());

    info!(
        "🔌 Loading {} into {}",
        snapshot_path.display(),
        config.warehouse.display_target()
    );

    let loader = WarehouseLoader::new(config.warehouse.clone());
    let report = loader
        .load(&snapshot_path)
        .await
        .with_context(|| format!("Failed to load {} into the warehouse", snapshot_path.display()))?;

    info!(
        "✅ {} now holds {} rows",
        report.table, report.rows_inserted
    );

    Ok(())
}
