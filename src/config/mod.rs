pub mod pipeline_config;
pub mod warehouse_config;

pub use pipeline_config::*;
pub use warehouse_config::*;

use std::path::Path;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "src/configs/pipeline.toml";

/// Value following `--config`/`-c`, or the default path.
pub fn config_path_from_args(args: &[String]) -> &str {
    args.iter()
        .position(|arg| arg == "--config" || arg == "-c")
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_PATH)
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_or_default(path: &str) -> anyhow::Result<PipelineConfig> {
    if Path::new(path).exists() {
        PipelineConfig::from_file(path)
    } else {
        warn!("Config file not found at {}, using defaults", path);
        Ok(PipelineConfig::default())
    }
}
