//! Core data structures and types for battery dataset processing.
//!
//! Defines record types, metadata entries, per-entry load outcomes and
//! processing statistics used throughout the library.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Measurement file types listed in the metadata table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Charge,
    Discharge,
    Impedance,
}

impl RecordType {
    /// Classify the raw `type` value; unrecognized values yield `None`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "charge" => Some(RecordType::Charge),
            "discharge" => Some(RecordType::Discharge),
            "impedance" => Some(RecordType::Impedance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Charge => "charge",
            RecordType::Discharge => "discharge",
            RecordType::Impedance => "impedance",
        }
    }

    /// Which aggregate this record type belongs to
    pub fn collection(&self) -> Collection {
        match self {
            RecordType::Charge | RecordType::Discharge => Collection::ChargeDischarge,
            RecordType::Impedance => Collection::Impedance,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two output aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ChargeDischarge,
    Impedance,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::ChargeDischarge => f.write_str("charge/discharge"),
            Collection::Impedance => f.write_str("impedance"),
        }
    }
}

/// One metadata row describing a single measurement file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub filename: String,
    /// Raw `type` label as found in the metadata table
    pub record_type: String,
    /// Raw textual timestamp, parsed during enrichment
    pub start_time: String,
    pub ambient_temperature: Option<f64>,
    pub battery_id: String,
    pub test_id: Option<i64>,
    pub uid: Option<i64>,
    pub capacity: Option<f64>,
    pub re: Option<f64>,
    pub rct: Option<f64>,
}

impl MetadataEntry {
    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_label(&self.record_type)
    }

    /// Location of the referenced measurement file
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.filename)
    }
}

/// What happened to a single metadata entry during the load pass
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Loaded { record_type: RecordType, rows: usize },
    FileMissing { path: PathBuf },
    UnrecognizedType { label: String },
}

/// Progress notification emitted once per metadata entry
#[derive(Debug)]
pub struct LoadProgress<'a> {
    /// 1-based position of the entry in source order
    pub position: usize,
    pub total: usize,
    pub entry: &'a MetadataEntry,
    pub outcome: &'a EntryOutcome,
}

/// Processing statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessingStats {
    pub entries_total: usize,
    pub files_loaded: usize,
    pub files_missing: usize,
    pub entries_unrecognized: usize,
    pub charge_discharge_rows: usize,
    pub impedance_rows: usize,
    pub timestamp_failures: usize,
    pub complex_failures: usize,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    pub fn record(&mut self, outcome: &EntryOutcome) {
        self.entries_total += 1;
        match outcome {
            EntryOutcome::Loaded { record_type, rows } => {
                self.files_loaded += 1;
                match record_type.collection() {
                    Collection::ChargeDischarge => self.charge_discharge_rows += rows,
                    Collection::Impedance => self.impedance_rows += rows,
                }
            }
            EntryOutcome::FileMissing { .. } => self.files_missing += 1,
            EntryOutcome::UnrecognizedType { .. } => self.entries_unrecognized += 1,
        }
    }
}
