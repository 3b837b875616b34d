//! End-to-end processing scenarios

use super::{charge_csv, create_dataset, impedance_csv};
use crate::constants::impedance_columns::*;
use crate::constants::metadata_columns::*;
use crate::pipeline::BatteryPipeline;
use polars::prelude::*;
use std::collections::HashSet;
use tempfile::TempDir;

const CHARGE_ROW: &str =
    "charge,\"[2010.     7.    21.    15.     0.    35.093]\",24,B0047,0,1,00001.csv,,,";
const IMPEDANCE_ROW: &str = "impedance,\"[2010.     7.    21.    16.    53.    45.968]\",24,B0047,1,2,00002.csv,,0.05605783343888099,0.20097016584458333";
const MISSING_ROW: &str =
    "discharge,\"[2010.     7.    21.    17.    25.    40.671]\",24,B0047,2,3,00003.csv,1.6743,,";

fn uids(df: &DataFrame) -> Vec<Option<i64>> {
    let column = df.column(UID).unwrap();
    column.as_materialized_series().i64().unwrap().into_iter().collect()
}

fn labels(df: &DataFrame, name: &str) -> HashSet<String> {
    let column = df.column(name).unwrap();
    column
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_end_to_end_with_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[CHARGE_ROW, IMPEDANCE_ROW, MISSING_ROW],
        &[
            ("00001.csv", charge_csv(10)),
            ("00002.csv", impedance_csv(5)),
        ],
    );

    let output = BatteryPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.charge_discharge.height(), 10);
    assert_eq!(output.impedance.height(), 5);

    assert!(uids(&output.charge_discharge).iter().all(|uid| *uid == Some(1)));
    assert!(uids(&output.impedance).iter().all(|uid| *uid == Some(2)));
    assert!(!uids(&output.charge_discharge).contains(&Some(3)));
    assert!(!uids(&output.impedance).contains(&Some(3)));

    assert_eq!(labels(&output.charge_discharge, BATTERY_ID).len(), 1);
    let re = output.impedance.column(RE).unwrap();
    let re = re.as_materialized_series().f64().unwrap();
    assert!(re.into_iter().all(|v| v == Some(0.05605783343888099)));

    for name in [
        BATTERY_IMPEDANCE_REAL,
        BATTERY_IMPEDANCE_IMAG,
        RECTIFIED_IMPEDANCE_REAL,
        RECTIFIED_IMPEDANCE_IMAG,
    ] {
        let column = output.impedance.column(name).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64, "column {}", name);
    }
    let real = output.impedance.column(BATTERY_IMPEDANCE_REAL).unwrap();
    let real = real.as_materialized_series().f64().unwrap();
    assert_eq!(real.get(0), Some(0.05));

    let start = output.charge_discharge.column(START_TIME).unwrap();
    assert_eq!(start.null_count(), 0);

    assert_eq!(output.stats.entries_total, 3);
    assert_eq!(output.stats.files_loaded, 2);
    assert_eq!(output.stats.files_missing, 1);
    assert_eq!(output.stats.charge_discharge_rows, 10);
    assert_eq!(output.stats.impedance_rows, 5);
    assert_eq!(output.stats.timestamp_failures, 0);
    assert_eq!(output.stats.complex_failures, 0);
}

#[test]
fn test_partition_by_record_type() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[
            "charge,2010 7 21 15 0 35.0,24,B0047,0,1,00001.csv,,,",
            "discharge,2010 7 21 16 0 35.0,24,B0047,1,2,00002.csv,1.67,,",
            "impedance,2010 7 21 17 0 35.0,24,B0047,2,3,00003.csv,,0.056,0.2",
            "charge,2010 7 21 18 0 35.0,24,B0047,3,4,00004.csv,,,",
            "impedance,2010 7 21 19 0 35.0,24,B0047,4,5,00005.csv,,0.057,0.21",
        ],
        &[
            ("00001.csv", charge_csv(3)),
            ("00002.csv", charge_csv(4)),
            ("00003.csv", impedance_csv(2)),
            ("00004.csv", charge_csv(1)),
            ("00005.csv", impedance_csv(3)),
        ],
    );

    let output = BatteryPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.charge_discharge.height(), 8);
    assert_eq!(output.impedance.height(), 5);

    let charge_types = labels(&output.charge_discharge, TYPE);
    assert_eq!(
        charge_types,
        HashSet::from(["charge".to_string(), "discharge".to_string()])
    );
    assert_eq!(
        labels(&output.impedance, TYPE),
        HashSet::from(["impedance".to_string()])
    );

    let charge_uids: HashSet<_> = uids(&output.charge_discharge).into_iter().collect();
    let impedance_uids: HashSet<_> = uids(&output.impedance).into_iter().collect();
    assert!(charge_uids.is_disjoint(&impedance_uids));
    assert_eq!(impedance_uids, HashSet::from([Some(3), Some(5)]));

    // File order, then row order
    assert_eq!(
        uids(&output.charge_discharge),
        vec![
            Some(1),
            Some(1),
            Some(1),
            Some(2),
            Some(2),
            Some(2),
            Some(2),
            Some(4)
        ]
    );
}

#[test]
fn test_idempotent_runs() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[CHARGE_ROW, IMPEDANCE_ROW, MISSING_ROW],
        &[
            ("00001.csv", charge_csv(6)),
            ("00002.csv", impedance_csv(4)),
        ],
    );

    let pipeline = BatteryPipeline::new(config).unwrap();
    let first = pipeline.run().unwrap();
    let second = pipeline.run().unwrap();

    assert_eq!(
        first.charge_discharge.get_column_names(),
        second.charge_discharge.get_column_names()
    );
    assert!(first.charge_discharge.equals_missing(&second.charge_discharge));
    assert!(first.impedance.equals_missing(&second.impedance));
    assert_eq!(
        first.stats.charge_discharge_rows,
        second.stats.charge_discharge_rows
    );
}

#[test]
fn test_value_failures_degrade_without_aborting() {
    let temp_dir = TempDir::new().unwrap();
    let impedance = "Battery_impedance,Rectified_Impedance\n\
                     (0.05-0.01j),(0.04+0.001j)\n\
                     not-a-number,(0.04+0.002j)\n\
                     ,(0.04+0.003j)\n\
                     (0.06-0.02j),garbage\n"
        .to_string();
    let config = create_dataset(
        &temp_dir,
        &[
            "charge,\"2010,7,,,21.\",24,B0047,0,1,00001.csv,,,",
            "impedance,2010 7 21 16 53 45.968,24,B0047,1,2,00002.csv,,0.056,0.2",
        ],
        &[("00001.csv", charge_csv(2)), ("00002.csv", impedance)],
    );

    let output = BatteryPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.impedance.height(), 4);
    let real = output.impedance.column(BATTERY_IMPEDANCE_REAL).unwrap();
    let real: Vec<f64> = real
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert_eq!(real[0], 0.05);
    assert!(real[1].is_nan());
    assert!(real[2].is_nan());
    assert_eq!(real[3], 0.06);

    let rectified = output.impedance.column(RECTIFIED_IMPEDANCE_IMAG).unwrap();
    let rectified = rectified.as_materialized_series().f64().unwrap();
    assert!(rectified.get(3).unwrap().is_nan());

    let start = output.charge_discharge.column(START_TIME).unwrap();
    assert_eq!(start.null_count(), 2);

    assert_eq!(output.stats.timestamp_failures, 1);
    assert_eq!(output.stats.complex_failures, 3);
}

#[test]
fn test_header_only_file_keeps_numeric_columns() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[
            CHARGE_ROW,
            IMPEDANCE_ROW,
            "charge,2010 7 21 18 0 0,24,B0047,3,9,00009.csv,,,",
        ],
        &[
            ("00001.csv", charge_csv(3)),
            ("00002.csv", impedance_csv(2)),
            ("00009.csv", charge_csv(0)),
        ],
    );

    let output = BatteryPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.charge_discharge.height(), 3);
    for name in ["Voltage_measured", "Time"] {
        let column = output.charge_discharge.column(name).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64, "column {}", name);
    }
    assert_eq!(
        labels(&output.charge_discharge, BATTERY_ID),
        HashSet::from(["B0047".to_string()])
    );
    assert_eq!(output.stats.files_loaded, 3);
}

#[test]
fn test_unrecognized_types_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[
            CHARGE_ROW,
            IMPEDANCE_ROW,
            "calibration,2010 7 21 18 0 0,24,B0047,3,9,00009.csv,,,",
        ],
        &[
            ("00001.csv", charge_csv(2)),
            ("00002.csv", impedance_csv(2)),
            ("00009.csv", charge_csv(7)),
        ],
    );

    let output = BatteryPipeline::new(config).unwrap().run().unwrap();

    assert_eq!(output.charge_discharge.height(), 2);
    assert!(!uids(&output.charge_discharge).contains(&Some(9)));
    assert_eq!(output.stats.entries_unrecognized, 1);
}

#[test]
fn test_progress_reported_once_per_entry() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[CHARGE_ROW, IMPEDANCE_ROW, MISSING_ROW],
        &[
            ("00001.csv", charge_csv(1)),
            ("00002.csv", impedance_csv(1)),
        ],
    );

    let mut seen = Vec::new();
    BatteryPipeline::new(config)
        .unwrap()
        .run_with_progress(|progress| {
            seen.push((progress.position, progress.total, progress.entry.uid))
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![(1, 3, Some(1)), (2, 3, Some(2)), (3, 3, Some(3))]
    );
}

#[test]
fn test_progress_bar_sized_to_entries() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_dataset(
        &temp_dir,
        &[CHARGE_ROW, IMPEDANCE_ROW, MISSING_ROW],
        &[
            ("00001.csv", charge_csv(1)),
            ("00002.csv", impedance_csv(1)),
        ],
    );
    let pipeline = BatteryPipeline::new(config).unwrap();

    let pb = pipeline.progress_bar(3);
    assert_eq!(pb.length(), Some(3));
    assert_eq!(pb.position(), 0);

    let pb = pipeline.progress_bar(0);
    assert_eq!(pb.length(), Some(0));
}
