use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::warehouse_config::{WarehouseConfig, WarehouseSection};
use crate::models::Region;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfigFile {
    pub sources: SourcesConfig,
    pub snapshot: SnapshotConfig,
    pub pipeline: RunConfig,
    pub warehouse: WarehouseSection,
}

/// Where the regional extracts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Extra attempts for a stage that fails.
    pub retries: u32,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sources: SourcesConfig,
    pub snapshot: SnapshotConfig,
    pub pipeline: RunConfig,
    pub warehouse: WarehouseConfig,
}

impl PipelineConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config file: {}", path))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse pipeline config file: {}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: PipelineConfigFile = toml::from_str(content)?;
        let config = Self::from_file_sections(file);
        config.validate()?;
        Ok(config)
    }

    fn from_file_sections(file: PipelineConfigFile) -> Self {
        Self {
            sources: file.sources,
            snapshot: file.snapshot,
            pipeline: file.pipeline,
            warehouse: WarehouseConfig::from_section(file.warehouse),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshot.path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Snapshot path cannot be empty"));
        }

        self.warehouse.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_file_sections(PipelineConfigFile::default())
    }
}

impl SourcesConfig {
    pub fn path_for(&self, region: Region) -> PathBuf {
        self.data_dir.join(region.file_name())
    }

    /// The fixed (region, path) pairs the reader consumes.
    pub fn region_paths(&self) -> Vec<(Region, PathBuf)> {
        Region::ALL
            .iter()
            .map(|region| (*region, self.path_for(*region)))
            .collect()
    }

    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/cleaned_canada.csv"),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { retries: 1 }
    }
}
