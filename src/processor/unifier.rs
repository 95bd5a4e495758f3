use polars::prelude::*;
use tracing::{debug, info};

use super::frame_ops::{column_names, has_column};
use crate::error::Result;
use crate::models::RegionExtract;

/// Concatenates regional extracts row-wise over the union of their columns.
pub struct Unifier;

impl Unifier {
    pub fn new() -> Self {
        Unifier
    }

    pub fn unify(&self, extracts: &[RegionExtract]) -> Result<DataFrame> {
        let union = Self::column_union(extracts);

        let mut combined: Option<DataFrame> = None;
        for extract in extracts {
            let aligned = Self::align_to(&extract.frame, &union)?;
            debug!(
                "Aligned region {}: {} rows, {} source columns",
                extract.region,
                aligned.height(),
                extract.frame.width()
            );

            match combined.as_mut() {
                Some(df) => {
                    df.vstack_mut(&aligned)?;
                }
                None => combined = Some(aligned),
            }
        }

        let df = combined.unwrap_or_else(DataFrame::empty);

        info!(
            "Unified {} regions into {} rows x {} columns",
            extracts.len(),
            df.height(),
            df.width()
        );

        Ok(df)
    }

    /// Column names in order of first appearance across extracts.
    fn column_union(extracts: &[RegionExtract]) -> Vec<String> {
        let mut union: Vec<String> = Vec::new();
        for extract in extracts {
            for name in column_names(&extract.frame) {
                if !union.contains(&name) {
                    union.push(name);
                }
            }
        }
        union
    }

    fn align_to(frame: &DataFrame, union: &[String]) -> Result<DataFrame> {
        let mut aligned = frame.clone();
        for name in union {
            if !has_column(&aligned, name) {
                let nulls = Series::full_null(name.as_str().into(), aligned.height(), &DataType::String);
                aligned.with_column(nulls)?;
            }
        }

        // Every extract is read as text, but keep the stack well-typed regardless.
        for name in union {
            let column = aligned.column(name)?;
            if column.dtype() != &DataType::String {
                let cast = column.cast(&DataType::String)?;
                aligned.with_column(cast)?;
            }
        }

        Ok(aligned.select(union.iter().map(|s| s.as_str()))?)
    }
}

impl Default for Unifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;
    use crate::processor::frame_ops::text_values;

    #[test]
    fn test_union_of_columns_with_nulls() {
        let ab = df!(
            "streetAddress" => &["1 Main St", "2 Main St"],
            "price" => &["100000", "200000"]
        )
        .unwrap();
        let bc = df!(
            "streetAddress" => &["3 Oak Ave"],
            "View" => &["Ocean"]
        )
        .unwrap();

        let extracts = vec![
            RegionExtract::new(Region::Alberta, ab),
            RegionExtract::new(Region::BritishColumbia, bc),
        ];
        let df = Unifier::new().unify(&extracts).unwrap();

        assert_eq!(column_names(&df), vec!["streetAddress", "price", "View"]);
        assert_eq!(df.height(), 3);
        assert_eq!(
            text_values(&df, "streetAddress").unwrap(),
            vec![
                Some("1 Main St".to_string()),
                Some("2 Main St".to_string()),
                Some("3 Oak Ave".to_string())
            ]
        );
        assert_eq!(
            text_values(&df, "price").unwrap(),
            vec![Some("100000".to_string()), Some("200000".to_string()), None]
        );
        assert_eq!(
            text_values(&df, "View").unwrap(),
            vec![None, None, Some("Ocean".to_string())]
        );
    }

    #[test]
    fn test_no_deduplication() {
        let row = df!("a" => &["same"]).unwrap();
        let extracts = vec![
            RegionExtract::new(Region::Alberta, row.clone()),
            RegionExtract::new(Region::Yukon, row),
        ];
        let df = Unifier::new().unify(&extracts).unwrap();
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_empty_input() {
        let df = Unifier::new().unify(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }
}
