//! Aggregation of per-file tables into one table per collection
//!
//! Tables are stacked in load order with a diagonal concat: the output
//! carries the union of all columns, filling absent ones with nulls, and
//! widens differing column types to a common supertype. Text columns of
//! a zero-row table (a header-only file) are retyped as `Null` first so
//! they never widen numeric columns to `String`.

use crate::error::{BatteryError, Result};
use crate::models::Collection;
use polars::prelude::*;
use tracing::debug;

/// Concatenate the tables of one collection, preserving file then row order
pub fn aggregate(frames: Vec<DataFrame>, collection: Collection) -> Result<DataFrame> {
    if frames.is_empty() {
        return Err(BatteryError::EmptyAggregate {
            kind: collection.to_string(),
        });
    }

    debug!("Concatenating {} {} tables", frames.len(), collection);

    let lazy_frames = frames
        .into_iter()
        .map(|df| relax_empty_frame(df).map(|df| df.lazy()))
        .collect::<Result<Vec<LazyFrame>>>()?;
    let combined = concat_lf_diagonal(
        lazy_frames,
        UnionArgs {
            rechunk: true,
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;

    debug!(
        "{} aggregate: {} rows x {} columns",
        collection,
        combined.height(),
        combined.width()
    );
    Ok(combined)
}

fn relax_empty_frame(df: DataFrame) -> Result<DataFrame> {
    if df.height() > 0 {
        return Ok(df);
    }

    let columns = df
        .get_columns()
        .iter()
        .map(|column| match column.dtype() {
            DataType::String => Column::full_null(column.name().clone(), 0, &DataType::Null),
            _ => column.clone(),
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}
