use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use tracing::info;

use super::csv_io::write_csv;
use crate::error::Result;

/// Persists the canonical dataset; the file is the contract with the loader.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotWriter { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, df: &DataFrame) -> Result<()> {
        let mut df = df.clone();
        write_csv(&mut df, &self.path)?;
        info!(
            "Snapshot saved to {} ({} rows, {} columns)",
            self.path.display(),
            df.height(),
            df.width()
        );
        Ok(())
    }
}
