//! CSV table reading and column checks shared by the metadata reader and
//! the record loader.

use crate::error::{BatteryError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Read a full CSV file with a header row into a DataFrame
pub fn read_csv_table(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    read_table(path, infer_schema_length)
}

/// Read a full CSV file keeping every column as `String`
///
/// Callers cast columns themselves, so a stray value late in the file
/// cannot contradict a dtype inferred from the leading rows.
pub fn read_csv_table_as_text(path: &Path) -> Result<DataFrame> {
    read_table(path, 0)
}

fn read_table(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(infer_schema_length))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|source| BatteryError::TableRead {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Fail with `MissingColumn` for the first required column not present
pub fn require_columns(df: &DataFrame, columns: &[&str], path: &Path) -> Result<()> {
    let names = df.get_column_names();
    match columns
        .iter()
        .find(|required| !names.iter().any(|name| name.as_str() == **required))
    {
        Some(missing) => Err(BatteryError::MissingColumn {
            path: path.to_path_buf(),
            column: missing.to_string(),
        }),
        None => Ok(()),
    }
}
