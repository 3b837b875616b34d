//! Batch pipeline for battery test datasets.
//!
//! Reads the metadata table, loads and enriches every referenced
//! measurement file in source order, and concatenates the results into a
//! charge/discharge table and an impedance table returned to the caller.

pub mod aggregator;
pub mod loader;

#[cfg(test)]
pub mod tests;

use self::aggregator::aggregate;
use self::loader::RecordLoader;

use crate::config::ProcessorConfig;
use crate::constants::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::error::Result;
use crate::metadata::load_metadata;
use crate::models::{Collection, LoadProgress, MetadataEntry, ProcessingStats};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::{debug, info};

/// Aggregated tables produced by one run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub charge_discharge: DataFrame,
    pub impedance: DataFrame,
    pub stats: ProcessingStats,
}

/// Entry point for processing a battery dataset
#[derive(Debug)]
pub struct BatteryPipeline {
    config: ProcessorConfig,
    loader: RecordLoader,
}

impl BatteryPipeline {
    /// Create a pipeline after validating the configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let loader = RecordLoader::new(config.data_dir.clone(), config.infer_schema_length);
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Run the full batch, showing a progress bar when enabled
    pub fn run(&self) -> Result<PipelineOutput> {
        let start_time = Instant::now();
        let entries = self.load_entries()?;

        let pb = self.progress_bar(entries.len());
        let result = self.process(&entries, |progress| {
            pb.set_message(format!("Processing: {}", progress.entry.filename));
            pb.inc(1);
        });

        match &result {
            Ok(_) => pb.finish_with_message("All measurement files processed"),
            Err(_) => pb.abandon_with_message("Processing aborted"),
        }
        result.map(|output| with_elapsed(output, start_time))
    }

    /// Run the full batch, reporting each processed entry to `on_progress`
    pub fn run_with_progress<F>(&self, on_progress: F) -> Result<PipelineOutput>
    where
        F: FnMut(&LoadProgress<'_>),
    {
        let start_time = Instant::now();
        let entries = self.load_entries()?;
        let output = self.process(&entries, on_progress)?;
        Ok(with_elapsed(output, start_time))
    }

    fn load_entries(&self) -> Result<Vec<MetadataEntry>> {
        let entries = load_metadata(&self.config.metadata_path)?;
        info!(
            "Processing {} metadata entries from {}",
            entries.len(),
            self.config.metadata_path.display()
        );
        Ok(entries)
    }

    /// Bar sized to the metadata entry count, hidden when progress is off
    pub(crate) fn progress_bar(&self, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        if !self.config.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
            return pb;
        }

        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_CHARS),
        );
        pb.set_message("Loading files");
        pb
    }

    fn process<F>(&self, entries: &[MetadataEntry], on_progress: F) -> Result<PipelineOutput>
    where
        F: FnMut(&LoadProgress<'_>),
    {
        let loaded = self.loader.load_all(entries, on_progress)?;

        debug!(
            "Aggregating {} charge/discharge and {} impedance tables",
            loaded.charge_discharge.len(),
            loaded.impedance.len()
        );
        let charge_discharge = aggregate(loaded.charge_discharge, Collection::ChargeDischarge)?;
        let impedance = aggregate(loaded.impedance, Collection::Impedance)?;

        Ok(PipelineOutput {
            charge_discharge,
            impedance,
            stats: loaded.stats,
        })
    }
}

fn with_elapsed(mut output: PipelineOutput, start_time: Instant) -> PipelineOutput {
    output.stats.processing_time_ms = start_time.elapsed().as_millis();
    output
}
