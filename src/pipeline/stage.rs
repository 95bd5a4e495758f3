use polars::prelude::DataFrame;

use crate::error::Result;

/// One transformation step: takes the previous stage's dataset and returns a new one.
///
/// Implementations must be deterministic so a failed stage can be rerun on the
/// same input.
pub trait Stage {
    fn name(&self) -> &'static str;

    fn apply(&self, df: DataFrame) -> Result<DataFrame>;
}
