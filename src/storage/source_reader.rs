use std::path::{Path, PathBuf};
use tracing::info;

use super::csv_io::read_text_csv;
use crate::error::{PipelineError, Result};
use crate::models::{Region, RegionExtract};

/// Reads every regional extract. One missing region fails the whole read.
pub struct SourceReader {
    sources: Vec<(Region, PathBuf)>,
}

impl SourceReader {
    pub fn new(sources: Vec<(Region, PathBuf)>) -> Self {
        SourceReader { sources }
    }

    pub fn read_all(&self) -> Result<Vec<RegionExtract>> {
        let mut extracts = Vec::with_capacity(self.sources.len());
        for (region, path) in &self.sources {
            let extract = Self::read_region(*region, path)?;
            info!(
                "Loaded region {} from {}: {} rows, {} columns",
                region,
                path.display(),
                extract.frame.height(),
                extract.frame.width()
            );
            extracts.push(extract);
        }

        let total_rows: usize = extracts.iter().map(RegionExtract::height).sum();
        info!("Loaded {} regions, {} rows in total", extracts.len(), total_rows);
        Ok(extracts)
    }

    pub fn read_region(region: Region, path: &Path) -> Result<RegionExtract> {
        let missing = |reason: String| PipelineError::MissingSourceFile {
            region: region.to_string(),
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(missing("file not found".to_string()));
        }

        let frame = read_text_csv(path).map_err(|e| missing(e.to_string()))?;
        Ok(RegionExtract::new(region, frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::frame_ops::text_values;
    use std::fs;

    #[test]
    fn test_reads_all_columns_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_ab.csv");
        fs::write(
            &path,
            "streetAddress,price,Bath\n1 Main St,350000,2\n2 Main St,,1.5\n",
        )
        .unwrap();

        let extract = SourceReader::read_region(Region::Alberta, &path).unwrap();

        assert_eq!(extract.region, Region::Alberta);
        assert_eq!(extract.height(), 2);
        assert_eq!(
            text_values(&extract.frame, "price").unwrap(),
            vec![Some("350000".to_string()), None]
        );
        assert_eq!(
            text_values(&extract.frame, "Bath").unwrap(),
            vec![Some("2".to_string()), Some("1.5".to_string())]
        );
    }

    #[test]
    fn test_missing_region_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("data_ab.csv");
        fs::write(&present, "streetAddress\n1 Main St\n").unwrap();

        let reader = SourceReader::new(vec![
            (Region::Alberta, present),
            (Region::BritishColumbia, dir.path().join("data_bc.csv")),
        ]);

        match reader.read_all() {
            Err(PipelineError::MissingSourceFile { region, .. }) => assert_eq!(region, "bc"),
            other => panic!("expected MissingSourceFile, got {:?}", other.map(|e| e.len())),
        }
    }
}
