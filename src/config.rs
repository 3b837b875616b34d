//! Configuration management and validation.
//!
//! Locates the metadata table and measurement directory (by default under
//! `./cleaned_dataset`) and holds the reader and display settings used by
//! the pipeline.

use crate::constants::{
    DATA_DIR_NAME, DEFAULT_DATASET_ROOT, DEFAULT_INFER_SCHEMA_LENGTH, METADATA_FILE_NAME,
};
use crate::error::{BatteryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Metadata table listing one measurement file per row
    pub metadata_path: PathBuf,

    /// Directory holding the measurement files named in the metadata
    pub data_dir: PathBuf,

    /// Rows sampled when inferring measurement file column types
    pub infer_schema_length: usize,

    /// Show a progress bar while loading measurement files
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self::from_dataset_root(Path::new(DEFAULT_DATASET_ROOT))
    }
}

impl ProcessorConfig {
    /// Configuration for the conventional `<root>/metadata.csv` + `<root>/data` layout
    pub fn from_dataset_root(root: &Path) -> Self {
        Self {
            metadata_path: root.join(METADATA_FILE_NAME),
            data_dir: root.join(DATA_DIR_NAME),
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
            show_progress: true,
        }
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Disable the progress bar (tests, quiet runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check that the inputs exist and settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.infer_schema_length == 0 {
            return Err(BatteryError::Configuration {
                message: "infer_schema_length must be at least 1".to_string(),
            });
        }

        if !self.metadata_path.is_file() {
            return Err(BatteryError::MetadataNotFound {
                path: self.metadata_path.clone(),
            });
        }

        if !self.data_dir.is_dir() {
            return Err(BatteryError::DataDirNotFound {
                path: self.data_dir.clone(),
            });
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}
