use polars::prelude::*;
use tracing::info;

use super::frame_ops::{drop_if_present, has_column, keep_rows, parse_number, require_column, text_values};
use crate::error::{PipelineError, Result};
use crate::models::columns::{BATHROOMS, BEDROOMS, PRICE, PROPERTY_BEDS, SQUARE_FOOTAGE, VIEW};
use crate::pipeline::Stage;

/// Enforces value-domain rules on consolidated listings.
pub struct DomainFilter {
    min_square_footage: f64,
    min_price: f64,
    noise_column: String,
}

impl DomainFilter {
    pub fn new() -> Self {
        Self {
            min_square_footage: 120.0,
            min_price: 50_000.0,
            noise_column: VIEW.to_string(),
        }
    }

    pub fn filter(&self, mut df: DataFrame) -> Result<DataFrame> {
        require_column(&df, self.name(), PROPERTY_BEDS)?;
        if has_column(&df, BEDROOMS) {
            return Err(PipelineError::InvalidSchema(format!(
                "cannot rename '{}' to '{}': column already present",
                PROPERTY_BEDS, BEDROOMS
            )));
        }
        df.rename(PROPERTY_BEDS, BEDROOMS.into())?;

        let df = self.drop_missing_counts(&df)?;
        let df = self.keep_where(&df, SQUARE_FOOTAGE, |sqft| sqft > self.min_square_footage)?;
        let mut df = self.keep_where(&df, PRICE, |price| price >= self.min_price)?;

        drop_if_present(&mut df, &self.noise_column)?;

        info!("Domain filtering complete, shape: {:?}", df.shape());
        Ok(df)
    }

    fn drop_missing_counts(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut mask = vec![true; df.height()];
        for field in [BEDROOMS, BATHROOMS, SQUARE_FOOTAGE] {
            require_column(df, self.name(), field)?;
            for (keep, value) in mask.iter_mut().zip(text_values(df, field)?) {
                if value.is_none() {
                    *keep = false;
                }
            }
        }
        keep_rows(df, &mask)
    }

    /// Keeps rows whose `field` parses as a number satisfying `rule`.
    fn keep_where(&self, df: &DataFrame, field: &str, rule: impl Fn(f64) -> bool) -> Result<DataFrame> {
        require_column(df, self.name(), field)?;

        let mask: Vec<bool> = text_values(df, field)?
            .iter()
            .map(|value| value.as_deref().and_then(parse_number).is_some_and(&rule))
            .collect();

        let filtered = keep_rows(df, &mask)?;
        info!(
            "Filter on {} removed {} rows",
            field,
            df.height() - filtered.height()
        );
        Ok(filtered)
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for DomainFilter {
    fn name(&self) -> &'static str {
        "domain_filter"
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        self.filter(df)
    }
}
