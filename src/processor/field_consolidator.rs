use polars::prelude::*;
use tracing::info;

use super::frame_ops::{drop_if_present, has_column, keep_rows, optional_text_values, parse_number, text_series};
use crate::error::Result;
use crate::models::columns::{ACREAGE, BATH, BATHROOMS, PROPERTY_BATHS, PROPERTY_SQFT, SQUARE_FOOTAGE};
use crate::pipeline::Stage;

/// Merges fields that regions publish under two alternate columns.
pub struct FieldConsolidator {
    sqft_suffix: String,
    acreage_default: String,
    bathroom_ceiling: f64,
}

impl FieldConsolidator {
    pub fn new() -> Self {
        Self {
            sqft_suffix: " SQFT".to_string(),
            acreage_default: "0".to_string(),
            bathroom_ceiling: 42.0,
        }
    }

    pub fn consolidate(&self, df: DataFrame) -> Result<DataFrame> {
        let df = self.consolidate_square_footage(df)?;
        let df = self.default_acreage(df)?;
        let df = self.consolidate_bathrooms(df)?;
        Ok(df)
    }

    /// `Square Footage` with its unit suffix removed, else raw `property-sqft`.
    pub fn consolidate_square_footage(&self, mut df: DataFrame) -> Result<DataFrame> {
        let primary = optional_text_values(&df, SQUARE_FOOTAGE)?;
        let secondary = optional_text_values(&df, PROPERTY_SQFT)?;

        let unified: Vec<Option<String>> = primary
            .into_iter()
            .zip(secondary)
            .map(|(primary, secondary)| {
                primary
                    .map(|value| self.strip_sqft_suffix(&value).to_string())
                    .or(secondary)
            })
            .collect();

        drop_if_present(&mut df, SQUARE_FOOTAGE)?;
        drop_if_present(&mut df, PROPERTY_SQFT)?;
        df.with_column(text_series(SQUARE_FOOTAGE, unified))?;

        info!("Consolidated square footage, shape: {:?}", df.shape());
        Ok(df)
    }

    /// Missing acreage means none; rows are never dropped here.
    pub fn default_acreage(&self, mut df: DataFrame) -> Result<DataFrame> {
        let filled: Vec<Option<String>> = optional_text_values(&df, ACREAGE)?
            .into_iter()
            .map(|value| value.or_else(|| Some(self.acreage_default.clone())))
            .collect();

        let existed = has_column(&df, ACREAGE);
        df.with_column(text_series(ACREAGE, filled))?;

        if !existed {
            info!("No {} column in source data; created with defaults", ACREAGE);
        }
        Ok(df)
    }

    /// `property-baths`, else `Bath`; counts at or above the ceiling are sentinels.
    pub fn consolidate_bathrooms(&self, mut df: DataFrame) -> Result<DataFrame> {
        let primary = optional_text_values(&df, PROPERTY_BATHS)?;
        let secondary = optional_text_values(&df, BATH)?;

        let unified: Vec<Option<String>> = primary
            .into_iter()
            .zip(secondary)
            .map(|(primary, secondary)| primary.or(secondary))
            .collect();

        let mask: Vec<bool> = unified
            .iter()
            .map(|value| !self.is_bathroom_outlier(value.as_deref()))
            .collect();

        drop_if_present(&mut df, PROPERTY_BATHS)?;
        drop_if_present(&mut df, BATH)?;
        df.with_column(text_series(BATHROOMS, unified))?;

        let before = df.height();
        let df = keep_rows(&df, &mask)?;

        info!(
            "Consolidated bathrooms, dropped {} outliers, shape: {:?}",
            before - df.height(),
            df.shape()
        );
        Ok(df)
    }

    fn strip_sqft_suffix<'a>(&self, value: &'a str) -> &'a str {
        value.strip_suffix(self.sqft_suffix.as_str()).unwrap_or(value)
    }

    fn is_bathroom_outlier(&self, value: Option<&str>) -> bool {
        value
            .and_then(parse_number)
            .map(|count| count >= self.bathroom_ceiling)
            .unwrap_or(false)
    }
}

impl Default for FieldConsolidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for FieldConsolidator {
    fn name(&self) -> &'static str {
        "field_consolidator"
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        self.consolidate(df)
    }
}
