//! Battery Processor Library
//!
//! Joins battery test metadata onto per-test measurement files and derives
//! the numeric fields needed to chart impedance parameters across cycles.
//!
//! This library provides tools for:
//! - Parsing loosely formatted six-field start times into datetimes
//! - Splitting complex impedance literals into real and imaginary parts
//! - Loading measurement files referenced by a metadata table
//! - Aggregating charge/discharge and impedance records into two tables
//! - Extracting the impedance chart series

pub mod cli;
pub mod complex;
pub mod config;
pub mod constants;
pub mod error;
pub mod metadata;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod timestamp;

// Re-export commonly used types
pub use complex::{ComplexInput, ComplexPair, parse_complex_literal, split_complex_values};
pub use config::ProcessorConfig;
pub use error::{BatteryError, Result, ValueParseError};
pub use models::{MetadataEntry, ProcessingStats, RecordType};
pub use pipeline::{BatteryPipeline, PipelineOutput};
pub use report::{ChartSeries, ImpedanceReport};
pub use timestamp::parse_start_time;
