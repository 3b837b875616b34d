//! Record loading for battery measurement files
//!
//! Walks the metadata entries in source order, reads each referenced
//! measurement file, joins the entry's fields onto every row as constant
//! columns and, for impedance sweeps, splits the complex readings into
//! real and imaginary columns.

use crate::complex::split_complex_column;
use crate::constants::impedance_columns;
use crate::constants::metadata_columns::*;
use crate::error::{BatteryError, Result};
use crate::models::{
    Collection, EntryOutcome, LoadProgress, MetadataEntry, ProcessingStats, RecordType,
};
use crate::table::read_csv_table;
use crate::timestamp::parse_start_time;

use chrono::NaiveDateTime;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-file tables split by collection, in metadata order
#[derive(Debug, Default)]
pub struct LoadedRecords {
    pub charge_discharge: Vec<DataFrame>,
    pub impedance: Vec<DataFrame>,
    pub stats: ProcessingStats,
}

impl LoadedRecords {
    fn push(&mut self, collection: Collection, frame: DataFrame) {
        match collection {
            Collection::ChargeDischarge => self.charge_discharge.push(frame),
            Collection::Impedance => self.impedance.push(frame),
        }
    }
}

/// Loads and enriches the measurement file behind each metadata entry
#[derive(Debug, Clone)]
pub struct RecordLoader {
    data_dir: PathBuf,
    infer_schema_length: usize,
}

impl RecordLoader {
    pub fn new(data_dir: impl Into<PathBuf>, infer_schema_length: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            infer_schema_length,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every entry, calling `on_progress` once per entry
    ///
    /// Missing files and unrecognized types are skipped; a file that exists
    /// but cannot be read as a table aborts the whole load.
    pub fn load_all<F>(&self, entries: &[MetadataEntry], mut on_progress: F) -> Result<LoadedRecords>
    where
        F: FnMut(&LoadProgress<'_>),
    {
        let mut loaded = LoadedRecords::default();
        let total = entries.len();

        for (index, entry) in entries.iter().enumerate() {
            let outcome = match entry.record_type() {
                None => {
                    debug!(
                        "Skipping {} with unrecognized type '{}'",
                        entry.filename, entry.record_type
                    );
                    EntryOutcome::UnrecognizedType {
                        label: entry.record_type.clone(),
                    }
                }
                Some(record_type) => match self.load_entry(entry, record_type, &mut loaded.stats)? {
                    Some(frame) => {
                        let rows = frame.height();
                        loaded.push(record_type.collection(), frame);
                        EntryOutcome::Loaded { record_type, rows }
                    }
                    None => EntryOutcome::FileMissing {
                        path: entry.resolve_path(&self.data_dir),
                    },
                },
            };

            loaded.stats.record(&outcome);
            on_progress(&LoadProgress {
                position: index + 1,
                total,
                entry,
                outcome: &outcome,
            });
        }

        debug!(
            "Loaded {} charge/discharge and {} impedance tables from {} entries",
            loaded.charge_discharge.len(),
            loaded.impedance.len(),
            total
        );
        Ok(loaded)
    }

    /// Load a single entry's file, or `None` when the file is absent
    pub fn load_entry(
        &self,
        entry: &MetadataEntry,
        record_type: RecordType,
        stats: &mut ProcessingStats,
    ) -> Result<Option<DataFrame>> {
        let path = entry.resolve_path(&self.data_dir);
        if entry.filename.is_empty() || !path.is_file() {
            debug!("Skipping missing file: {}", path.display());
            return Ok(None);
        }

        let start_time = parse_start_time(&entry.start_time);
        if start_time.is_none() {
            stats.timestamp_failures += 1;
        }

        let raw = read_csv_table(&path, self.infer_schema_length)?;
        let mut frame = enrich_with_metadata(raw, entry, start_time)?;

        if record_type == RecordType::Impedance {
            stats.complex_failures += derive_impedance_parts(&mut frame, &path)?;
        }

        debug!(
            "Loaded {} file {} ({} rows)",
            record_type,
            path.display(),
            frame.height()
        );
        Ok(Some(frame))
    }
}

/// Broadcast every metadata field onto every row of `frame`
pub fn enrich_with_metadata(
    frame: DataFrame,
    entry: &MetadataEntry,
    start_time: Option<NaiveDateTime>,
) -> Result<DataFrame> {
    let enriched = frame
        .lazy()
        .with_columns([
            lit(entry.filename.clone()).alias(FILENAME),
            lit(entry.record_type.clone()).alias(TYPE),
            datetime_lit(start_time).alias(START_TIME),
            f64_lit(entry.ambient_temperature).alias(AMBIENT_TEMPERATURE),
            lit(entry.battery_id.clone()).alias(BATTERY_ID),
            i64_lit(entry.test_id).alias(TEST_ID),
            i64_lit(entry.uid).alias(UID),
            f64_lit(entry.capacity).alias(CAPACITY),
            f64_lit(entry.re).alias(RE),
            f64_lit(entry.rct).alias(RCT),
        ])
        .collect()?;
    Ok(enriched)
}

/// Add real/imag columns for both impedance literal columns
///
/// Returns the number of readings that could not be parsed.
pub fn derive_impedance_parts(frame: &mut DataFrame, path: &Path) -> Result<usize> {
    let mut failures = 0;
    for &(source, real_name, imag_name) in impedance_columns::DERIVED {
        let column = frame
            .column(source)
            .map_err(|_| BatteryError::MissingColumn {
                path: path.to_path_buf(),
                column: source.to_string(),
            })?;

        let split = split_complex_column(column)?;
        failures += split.failures;

        let (real, imag) = split.into_series(real_name, imag_name);
        frame.with_column(real)?;
        frame.with_column(imag)?;
    }
    Ok(failures)
}

fn f64_lit(value: Option<f64>) -> Expr {
    match value {
        Some(v) => lit(v),
        None => lit(NULL).cast(DataType::Float64),
    }
}

fn i64_lit(value: Option<i64>) -> Expr {
    match value {
        Some(v) => lit(v).cast(DataType::Int64),
        None => lit(NULL).cast(DataType::Int64),
    }
}

fn datetime_lit(value: Option<NaiveDateTime>) -> Expr {
    i64_lit(value.map(|dt| dt.and_utc().timestamp_micros()))
        .cast(DataType::Datetime(TimeUnit::Microseconds, None))
}
