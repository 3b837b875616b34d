//! Chart series for the impedance table.
//!
//! Extracts the three cycle-indexed series plotted from the impedance
//! aggregate: battery impedance (real part), electrolyte resistance and
//! charge transfer resistance, each against `test_id`. Rendering is left to
//! whatever consumes the series.

use crate::constants::impedance_columns::BATTERY_IMPEDANCE_REAL;
use crate::constants::metadata_columns::{RCT, RE, TEST_ID};
use crate::error::{BatteryError, Result};
use polars::prelude::*;

const CYCLE_LABEL: &str = "Cycle Number";

struct ChartDefinition {
    column: &'static str,
    title: &'static str,
    y_label: &'static str,
}

const CHARTS: [ChartDefinition; 3] = [
    ChartDefinition {
        column: BATTERY_IMPEDANCE_REAL,
        title: "Battery Impedance over Charge/Discharge Cycles",
        y_label: "Battery Impedance (Ohms)",
    },
    ChartDefinition {
        column: RE,
        title: "Electrolyte Resistance (Re) over Charge/Discharge Cycles",
        y_label: "Re (Ohms)",
    },
    ChartDefinition {
        column: RCT,
        title: "Charge Transfer Resistance (Rct) over Charge/Discharge Cycles",
        y_label: "Rct (Ohms)",
    },
];

/// One line chart: `(test_id, value)` points in table order
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub column: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<(i64, f64)>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest finite value, if any
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .map(|(_, value)| *value)
            .filter(|value| value.is_finite())
            .fold(None, |range, value| match range {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }

    /// Distinct cycles covered by the series
    pub fn cycle_count(&self) -> usize {
        let mut cycles: Vec<i64> = self.points.iter().map(|(cycle, _)| *cycle).collect();
        cycles.sort_unstable();
        cycles.dedup();
        cycles.len()
    }
}

/// The three impedance charts
#[derive(Debug, Clone, PartialEq)]
pub struct ImpedanceReport {
    pub series: Vec<ChartSeries>,
}

impl ImpedanceReport {
    /// Build the chart series from the impedance aggregate
    ///
    /// Rows without a `test_id` are dropped; null values become NaN so a
    /// plotted line shows a gap.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let cycles = numeric_column(df, TEST_ID, &DataType::Int64)?;
        let cycles = cycles.as_materialized_series().i64()?;

        let mut series = Vec::with_capacity(CHARTS.len());
        for chart in &CHARTS {
            let values = numeric_column(df, chart.column, &DataType::Float64)?;
            let values = values.as_materialized_series().f64()?;

            let points = cycles
                .into_iter()
                .zip(values)
                .filter_map(|(cycle, value)| cycle.map(|c| (c, value.unwrap_or(f64::NAN))))
                .collect();

            series.push(ChartSeries {
                column: chart.column,
                title: chart.title,
                x_label: CYCLE_LABEL,
                y_label: chart.y_label,
                points,
            });
        }

        Ok(Self { series })
    }

    pub fn get(&self, column: &str) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.column == column)
    }
}

fn numeric_column(df: &DataFrame, name: &str, target: &DataType) -> Result<Column> {
    let column = df.column(name).map_err(|_| BatteryError::ReportColumn {
        column: name.to_string(),
        reason: "column is missing".to_string(),
    })?;

    let dtype = column.dtype();
    if !(dtype.is_integer() || dtype.is_float()) {
        return Err(BatteryError::ReportColumn {
            column: name.to_string(),
            reason: format!("expected a numeric column, found {}", dtype),
        });
    }

    Ok(column.cast(target)?)
}
