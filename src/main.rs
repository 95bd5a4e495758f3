use anyhow::{Context, Result};
use housing_pipeline::config::{self, PipelineConfig};
use housing_pipeline::pipeline::Pipeline;
use housing_pipeline::warehouse::WarehouseLoader;
use std::env;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before anything reads them
    dotenv::dotenv().ok();

    housing_pipeline::init_tracing();

    let args: Vec<String> = env::args().collect();
    let load_after = args.iter().any(|arg| arg == "--load" || arg == "-l");
    let config_path = config::config_path_from_args(&args);

    let config = config::load_or_default(config_path)
        .with_context(|| format!("Failed to load pipeline configuration from {}", config_path))?;

    info!("🚀 Starting Canada housing pipeline");
    info!(
        "Sources: {}, snapshot: {}, retries per stage: {}",
        config.sources.data_dir.display(),
        config.snapshot.path.display(),
        config.pipeline.retries
    );

    let pipeline = Pipeline::from_config(&config);
    let report = pipeline.run().context("Pipeline run failed")?;

    info!("✅ Snapshot written: {} rows", report.output_rows);
    info!("📊 Run report: {}", serde_json::to_string(&report)?);

    if load_after {
        load_snapshot(config).await?;
    } else {
        info!("Skipping warehouse load (pass --load to run it)");
    }

    Ok(())
}

async fn load_snapshot(mut config: PipelineConfig) -> Result<()> {
    config
        .warehouse
        .load_credentials()
        .context("Warehouse credentials are required for --load")?;

    let loader = WarehouseLoader::new(config.warehouse.clone());
    match loader.load(&config.snapshot.path).await {
        Ok(report) => {
            info!("🎉 Warehouse load completed: {}", serde_json::to_string(&report)?);
            Ok(())
        }
        Err(e) => {
            error!("❌ Warehouse load failed; table left in its pre-run state");
            Err(e.into())
        }
    }
}
