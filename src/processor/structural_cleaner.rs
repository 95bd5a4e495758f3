use polars::prelude::*;
use tracing::info;

use super::frame_ops::{column_names, keep_rows, require_column, text_values};
use crate::error::Result;
use crate::models::columns::REQUIRED_FIELDS;
use crate::pipeline::Stage;

/// Removes duplicate rows, duplicate columns and rows missing a required field.
pub struct StructuralCleaner {
    required_fields: Vec<String>,
}

impl StructuralCleaner {
    pub fn new() -> Self {
        Self {
            required_fields: REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn clean(&self, df: DataFrame) -> Result<DataFrame> {
        let before = df.shape();

        let df = self.drop_duplicate_rows(&df)?;
        let df = self.drop_duplicate_columns(df)?;
        let df = self.drop_incomplete_rows(&df)?;

        info!(
            "Structural cleaning: {:?} -> {:?} (rows x columns)",
            before,
            df.shape()
        );
        Ok(df)
    }

    /// Keeps the first occurrence of every distinct row.
    fn drop_duplicate_rows(&self, df: &DataFrame) -> Result<DataFrame> {
        Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
    }

    /// Drops every column whose cells equal those of an earlier column.
    fn drop_duplicate_columns(&self, mut df: DataFrame) -> Result<DataFrame> {
        // With no rows every column compares equal; there is nothing to decide.
        if df.height() == 0 {
            return Ok(df);
        }

        let names = column_names(&df);
        let columns = Self::all_text_columns(&df)?;

        let mut duplicates = Vec::new();
        for (index, values) in columns.iter().enumerate() {
            if columns[..index].iter().any(|earlier| earlier == values) {
                duplicates.push(names[index].clone());
            }
        }

        for name in &duplicates {
            df.drop_in_place(name)?;
        }
        if !duplicates.is_empty() {
            info!("Dropped duplicate columns: {:?}", duplicates);
        }

        Ok(df)
    }

    fn drop_incomplete_rows(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut mask = vec![true; df.height()];
        for field in &self.required_fields {
            require_column(df, self.name(), field)?;
            for (keep, value) in mask.iter_mut().zip(text_values(df, field)?) {
                if value.is_none() {
                    *keep = false;
                }
            }
        }

        keep_rows(df, &mask)
    }

    fn all_text_columns(df: &DataFrame) -> Result<Vec<Vec<Option<String>>>> {
        column_names(df)
            .iter()
            .map(|name| text_values(df, name))
            .collect()
    }
}

impl Default for StructuralCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for StructuralCleaner {
    fn name(&self) -> &'static str {
        "structural_cleaner"
    }

    fn apply(&self, df: DataFrame) -> Result<DataFrame> {
        self.clean(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;

    fn listing_frame() -> DataFrame {
        df!(
            "streetAddress" => &[Some("1 Main St"), Some("1 Main St"), None, Some("9 Elm Rd")],
            "addressLocality" => &[Some("Calgary"), Some("Calgary"), Some("Regina"), Some("Halifax")],
            "addressRegion" => &[Some("AB"), Some("AB"), Some("SK"), Some("NS")],
            "price" => &[Some("350000"), Some("350000"), Some("120000"), None],
            "Bath" => &[Some("2"), Some("2"), Some("1"), Some("3")],
            "Bath copy" => &[Some("2"), Some("2"), Some("1"), Some("3")]
        )
        .unwrap()
    }

    #[test]
    fn test_clean_listing_frame() {
        let cleaned = StructuralCleaner::new().clean(listing_frame()).unwrap();

        // Duplicate row collapsed, missing street address and missing price dropped
        assert_eq!(cleaned.height(), 1);
        assert_eq!(
            column_names(&cleaned),
            vec!["streetAddress", "addressLocality", "addressRegion", "price", "Bath"]
        );
    }

    #[test]
    fn test_missing_street_address_is_dropped() {
        let df = df!(
            "streetAddress" => &[None, Some("4 Pine St")],
            "addressLocality" => &["Toronto", "Ottawa"],
            "addressRegion" => &["ON", "ON"],
            "price" => &["500000", "600000"]
        )
        .unwrap();

        let cleaned = StructuralCleaner::new().clean(df).unwrap();
        assert_eq!(cleaned.height(), 1);
        assert_eq!(
            text_values(&cleaned, "streetAddress").unwrap(),
            vec![Some("4 Pine St".to_string())]
        );
    }

    #[test]
    fn test_columns_equal_only_after_row_dedup_are_dropped() {
        let df = df!(
            "streetAddress" => &["1 Main St", "2 Main St"],
            "addressLocality" => &["Victoria", "Victoria"],
            "addressRegion" => &["BC", "BC"],
            "price" => &["400000", "410000"],
            "City" => &["Victoria", "Victoria"]
        )
        .unwrap();

        let cleaned = StructuralCleaner::new().clean(df).unwrap();
        assert!(!column_names(&cleaned).contains(&"City".to_string()));
        assert_eq!(cleaned.height(), 2);
    }

    #[test]
    fn test_quoted_empty_street_address_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data_ab.csv");
        std::fs::write(
            &path,
            "streetAddress,addressLocality,addressRegion,price\n\"\",Calgary,AB,100000\n\"  \",Banff,AB,200000\n7 Bow Tr,Canmore,AB,300000\n",
        )
        .unwrap();

        let df = crate::storage::csv_io::read_text_csv(&path).unwrap();
        let cleaned = StructuralCleaner::new().clean(df).unwrap();

        assert_eq!(
            text_values(&cleaned, "addressLocality").unwrap(),
            vec![Some("Banff".to_string()), Some("Canmore".to_string())]
        );
    }

    #[test]
    fn test_duplicate_rows_keep_first_occurrence_order() {
        let df = df!(
            "streetAddress" => &["3 Elm Rd", "1 Main St", "3 Elm Rd", "2 Oak Ave"],
            "addressLocality" => &["Moncton", "Fredericton", "Moncton", "Saint John"],
            "addressRegion" => &["NB", "NB", "NB", "NB"],
            "price" => &[Some("250000"), None, Some("250000"), Some("310000")]
        )
        .unwrap();

        let cleaned = StructuralCleaner::new().clean(df).unwrap();
        assert_eq!(
            text_values(&cleaned, "streetAddress").unwrap(),
            vec![Some("3 Elm Rd".to_string()), Some("2 Oak Ave".to_string())]
        );
    }

    #[test]
    fn test_required_column_absent() {
        let df = df!(
            "streetAddress" => &["1 Main St"],
            "addressLocality" => &["Whitehorse"],
            "addressRegion" => &["YT"]
        )
        .unwrap();

        let result = StructuralCleaner::new().clean(df);
        assert!(matches!(
            result,
            Err(PipelineError::RequiredColumnAbsent { column, .. }) if column == "price"
        ));
    }

    #[test]
    fn test_idempotent() {
        let cleaner = StructuralCleaner::new();
        let once = cleaner.clean(listing_frame()).unwrap();
        let twice = cleaner.clean(once.clone()).unwrap();
        assert!(once.equals_missing(&twice));
    }
}
