//! Application constants for the battery processor
//!
//! Column names, default dataset locations and reader settings shared by
//! the loader, the reporter and the CLI.

// =============================================================================
// Dataset Layout
// =============================================================================

/// Default dataset root, relative to the working directory
pub const DEFAULT_DATASET_ROOT: &str = "./cleaned_dataset";

/// Metadata table file name within the dataset root
pub const METADATA_FILE_NAME: &str = "metadata.csv";

/// Measurement file directory within the dataset root
pub const DATA_DIR_NAME: &str = "data";

/// Rows sampled by the CSV reader when inferring column types
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 1000;

// =============================================================================
// Metadata Columns
// =============================================================================

pub mod metadata_columns {
    pub const FILENAME: &str = "filename";
    pub const TYPE: &str = "type";
    pub const START_TIME: &str = "start_time";
    pub const AMBIENT_TEMPERATURE: &str = "ambient_temperature";
    pub const BATTERY_ID: &str = "battery_id";
    pub const TEST_ID: &str = "test_id";
    pub const UID: &str = "uid";
    pub const CAPACITY: &str = "Capacity";
    pub const RE: &str = "Re";
    pub const RCT: &str = "Rct";

    /// Columns the metadata table must provide
    pub const REQUIRED: &[&str] = &[
        FILENAME,
        TYPE,
        START_TIME,
        AMBIENT_TEMPERATURE,
        BATTERY_ID,
        TEST_ID,
        UID,
        CAPACITY,
        RE,
        RCT,
    ];
}

// =============================================================================
// Impedance Columns
// =============================================================================

pub mod impedance_columns {
    pub const BATTERY_IMPEDANCE: &str = "Battery_impedance";
    pub const RECTIFIED_IMPEDANCE: &str = "Rectified_Impedance";

    pub const BATTERY_IMPEDANCE_REAL: &str = "Battery_impedance_real";
    pub const BATTERY_IMPEDANCE_IMAG: &str = "Battery_impedance_imag";
    pub const RECTIFIED_IMPEDANCE_REAL: &str = "Rectified_Impedance_real";
    pub const RECTIFIED_IMPEDANCE_IMAG: &str = "Rectified_Impedance_imag";

    /// Source literal column paired with its derived (real, imag) columns
    pub const DERIVED: &[(&str, &str, &str)] = &[
        (
            BATTERY_IMPEDANCE,
            BATTERY_IMPEDANCE_REAL,
            BATTERY_IMPEDANCE_IMAG,
        ),
        (
            RECTIFIED_IMPEDANCE,
            RECTIFIED_IMPEDANCE_REAL,
            RECTIFIED_IMPEDANCE_IMAG,
        ),
    ];
}

// =============================================================================
// Progress Display
// =============================================================================

pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

pub const PROGRESS_CHARS: &str = "#>-";
