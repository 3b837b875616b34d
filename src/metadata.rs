//! Metadata table loading.
//!
//! Reads the metadata CSV once and converts it column-wise into
//! [`MetadataEntry`] values, one per measurement file, in source order.

use crate::constants::metadata_columns::*;
use crate::error::{BatteryError, Result};
use crate::models::MetadataEntry;
use crate::table::{read_csv_table_as_text, require_columns};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Read the metadata table and extract its entries
///
/// The table is read as text throughout; numeric fields are converted per
/// column afterwards, however far down a bad value sits.
pub fn load_metadata(path: &Path) -> Result<Vec<MetadataEntry>> {
    if !path.is_file() {
        return Err(BatteryError::MetadataNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = read_csv_table_as_text(path)?;
    let entries = entries_from_frame(&df, path)?;

    debug!(
        "Loaded {} metadata entries from {}",
        entries.len(),
        path.display()
    );
    Ok(entries)
}

/// Convert a metadata table into entries
///
/// Numeric fields are cast leniently: blanks and unparseable values become
/// `None` rather than failing the table.
pub fn entries_from_frame(df: &DataFrame, path: &Path) -> Result<Vec<MetadataEntry>> {
    require_columns(df, REQUIRED, path)?;

    let mut filename = string_values(df, FILENAME)?.into_iter();
    let mut record_type = string_values(df, TYPE)?.into_iter();
    let mut start_time = string_values(df, START_TIME)?.into_iter();
    let mut ambient_temperature = f64_values(df, AMBIENT_TEMPERATURE)?.into_iter();
    let mut battery_id = string_values(df, BATTERY_ID)?.into_iter();
    let mut test_id = i64_values(df, TEST_ID)?.into_iter();
    let mut uid = i64_values(df, UID)?.into_iter();
    let mut capacity = f64_values(df, CAPACITY)?.into_iter();
    let mut re = f64_values(df, RE)?.into_iter();
    let mut rct = f64_values(df, RCT)?.into_iter();

    Ok((0..df.height())
        .map(|_| MetadataEntry {
            filename: filename.next().flatten().unwrap_or_default(),
            record_type: record_type.next().flatten().unwrap_or_default(),
            start_time: start_time.next().flatten().unwrap_or_default(),
            ambient_temperature: ambient_temperature.next().flatten(),
            battery_id: battery_id.next().flatten().unwrap_or_default(),
            test_id: test_id.next().flatten(),
            uid: uid.next().flatten(),
            capacity: capacity.next().flatten(),
            re: re.next().flatten(),
            rct: rct.next().flatten(),
        })
        .collect())
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.as_materialized_series().f64()?.into_iter().collect())
}

// via Float64 so text such as "12.0" still yields 12
fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df
        .column(name)?
        .cast(&DataType::Float64)?
        .cast(&DataType::Int64)?;
    Ok(column.as_materialized_series().i64()?.into_iter().collect())
}
