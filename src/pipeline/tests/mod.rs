//! Scenario tests for the pipeline
//!
//! Each test builds a small dataset (metadata table plus measurement files)
//! in a temporary directory and runs the full batch over it.

pub mod scenarios;

use crate::config::ProcessorConfig;
use std::fs;
use tempfile::TempDir;

pub const METADATA_HEADER: &str =
    "type,start_time,ambient_temperature,battery_id,test_id,uid,filename,Capacity,Re,Rct";

/// Charge file with `rows` data rows
pub fn charge_csv(rows: usize) -> String {
    let mut csv = String::from(
        "Voltage_measured,Current_measured,Temperature_measured,Current_charge,Voltage_charge,Time\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "{:.3},{:.3},24.5,1.5,4.2,{:.1}\n",
            3.8 + i as f64 * 0.01,
            1.5 - i as f64 * 0.01,
            i as f64 * 2.5
        ));
    }
    csv
}

/// Impedance file with `rows` data rows of well-formed literals
pub fn impedance_csv(rows: usize) -> String {
    let mut csv = String::from(
        "Sense_current,Battery_current,Current_ratio,Battery_impedance,Rectified_Impedance\n",
    );
    for i in 0..rows {
        csv.push_str(&format!(
            "(1000.5+0.1j),(150.2-0.3j),(6.6+0.01j),({:.4}-0.0{}j),(0.04+0.00{}j)\n",
            0.05 + i as f64 * 0.001,
            i + 1,
            i + 1
        ));
    }
    csv
}

/// Write `metadata.csv` from rows (without header) and each data file
pub fn create_dataset(
    temp_dir: &TempDir,
    metadata_rows: &[&str],
    files: &[(&str, String)],
) -> ProcessorConfig {
    let root = temp_dir.path().join("cleaned_dataset");
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();

    let mut metadata = String::from(METADATA_HEADER);
    metadata.push('\n');
    for row in metadata_rows {
        metadata.push_str(row);
        metadata.push('\n');
    }
    fs::write(root.join("metadata.csv"), metadata).unwrap();

    for (name, contents) in files {
        fs::write(data_dir.join(name), contents).unwrap();
    }

    ProcessorConfig::from_dataset_root(&root).without_progress()
}
