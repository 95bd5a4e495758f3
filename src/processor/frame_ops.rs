//! Text-column helpers shared by the cleaning stages.
//!
//! Extracts are read with every column as UTF-8, so stages work on
//! `Option<String>` cells and only parse numbers where a rule needs them.

use polars::prelude::*;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

pub fn require_column(df: &DataFrame, stage: &'static str, name: &str) -> Result<()> {
    if has_column(df, name) {
        Ok(())
    } else {
        Err(PipelineError::required_column(stage, name))
    }
}

/// Cells of `name` as owned text. Non-string columns are cast first.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

/// Like [`text_values`], but an absent column reads as all-null.
pub fn optional_text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if has_column(df, name) {
        text_values(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

pub fn text_series(name: &str, values: Vec<Option<String>>) -> Series {
    Series::new(name.into(), values)
}

/// Keeps the rows whose mask entry is `true`.
pub fn keep_rows(df: &DataFrame, mask: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("mask".into(), mask);
    Ok(df.filter(&mask)?)
}

/// Drops `name` when present; absence is not an error.
pub fn drop_if_present(df: &mut DataFrame, name: &str) -> Result<()> {
    if has_column(df, name) {
        df.drop_in_place(name)?;
    }
    Ok(())
}

pub fn parse_number(value: &str) -> Option<f64> {
    f64::from_str(value.trim()).ok().filter(|n| !n.is_nan())
}
