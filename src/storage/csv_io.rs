//! File capabilities: "read tabular file at path" and "write dataset to path".

use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Reads a CSV with a header row, every column as text and empty fields as null.
/// Quoted empty fields (`""`) are null too.
pub fn read_text_csv(path: &Path) -> PolarsResult<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    empty_text_to_null(&df)
}

fn empty_text_to_null(df: &DataFrame) -> PolarsResult<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let values: StringChunked = column
                .str()?
                .into_iter()
                .map(|value| value.filter(|v| !v.is_empty()))
                .collect();
            Ok(Column::from(values.with_name(column.name().clone()).into_series()))
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    DataFrame::new(columns)
}

/// Overwrites `path` with `df` as CSV. Writes to a sibling temp file first so
/// readers never observe a half-written snapshot.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("csv.tmp");
    {
        let mut file = File::create(&tmp_path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)
            .map_err(std::io::Error::other)?;
    }
    fs::rename(&tmp_path, path)
}
