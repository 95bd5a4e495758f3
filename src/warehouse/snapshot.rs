use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::processor::frame_ops::{column_names, text_values};
use crate::storage::csv_io::read_text_csv;

/// The snapshot file held fully in memory as insert-ready rows.
#[derive(Debug, Clone)]
pub struct SnapshotRows {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl SnapshotRows {
    /// Reads the snapshot. A zero-byte or header-only file is an `EmptySnapshot`.
    pub fn read(path: &Path) -> Result<Self> {
        if fs::metadata(path)?.len() == 0 {
            return Err(PipelineError::EmptySnapshot(path.to_path_buf()));
        }

        let df = read_text_csv(path)?;
        if df.height() == 0 {
            return Err(PipelineError::EmptySnapshot(path.to_path_buf()));
        }

        let header = column_names(&df);
        let columns = header
            .iter()
            .map(|name| text_values(&df, name))
            .collect::<Result<Vec<_>>>()?;

        let rows = (0..df.height())
            .map(|row| {
                columns
                    .iter()
                    .map(|values| normalize_value(values[row].as_deref()))
                    .collect()
            })
            .collect();

        Ok(Self { header, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trims surrounding whitespace; blank cells become SQL NULL.
pub fn normalize_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
