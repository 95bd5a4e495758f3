use polars::prelude::*;
use tracing::info;

use super::frame_ops::require_column;
use crate::error::Result;
use crate::models::columns::CANONICAL_RENAMES;
use crate::pipeline::Stage;

/// Renames source fields to the canonical output schema.
pub struct Canonicalizer {
    renames: Vec<(String, String)>,
}

impl Canonicalizer {
    pub fn new() -> Self {
        Self {
            renames: CANONICAL_RENAMES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    pub fn canonicalize(&self, mut df: DataFrame) -> Result<DataFrame> {
        // Check everything up front so a schema mismatch leaves no half-renamed frame.
        for (from, _) in &self.renames {
            require_column(&df, self.name(), from)?;
        }

        for (from, to) in &self.renames {
            df.rename(from, to.as_str().into())?;
        }

        info!("Canonicalized {} columns", self.renames.len());
        Ok(df)
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for Canonicalizer {
    fn name(&self) -> &'static str {
        "canonicalizer"
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        self.canonicalize(df)
    }
}
