//! Command-line interface components.

use crate::config::ProcessorConfig;
use crate::constants::DEFAULT_DATASET_ROOT;
use crate::pipeline::PipelineOutput;
use crate::report::ImpedanceReport;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "battery_processor")]
#[command(
    about = "Join battery test metadata onto charge, discharge and impedance measurement files"
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Dataset root containing metadata.csv and the data/ directory
    #[arg(value_name = "DATASET_ROOT", default_value = DEFAULT_DATASET_ROOT)]
    pub dataset_root: PathBuf,

    /// Enable verbose logging (includes skipped entries)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    pub fn to_config(&self) -> ProcessorConfig {
        let config = ProcessorConfig::from_dataset_root(&self.dataset_root);
        if self.no_progress || self.quiet {
            config.without_progress()
        } else {
            config
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Set up the tracing subscriber, honouring `RUST_LOG` when set
pub fn setup_logging(args: &Args) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("battery_processor={}", args.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}

/// Print the run summary
pub fn print_summary(output: &PipelineOutput) {
    let stats = &output.stats;
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Metadata entries:".bright_cyan(),
        stats.entries_total.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files loaded:".bright_cyan(),
        stats.files_loaded.to_string().bright_white()
    );
    if stats.files_missing > 0 {
        println!(
            "  {} {}",
            "Files missing:".bright_yellow(),
            stats.files_missing.to_string().bright_yellow()
        );
    }
    if stats.entries_unrecognized > 0 {
        println!(
            "  {} {}",
            "Unrecognized types:".bright_yellow(),
            stats.entries_unrecognized.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {} rows x {} columns",
        "Charge/discharge:".bright_cyan(),
        output
            .charge_discharge
            .height()
            .to_string()
            .bright_white()
            .bold(),
        output.charge_discharge.width()
    );
    println!(
        "  {} {} rows x {} columns",
        "Impedance:".bright_cyan(),
        output.impedance.height().to_string().bright_white().bold(),
        output.impedance.width()
    );
    if stats.timestamp_failures > 0 || stats.complex_failures > 0 {
        println!(
            "  {} {} start times, {} impedance readings",
            "Unparseable values:".bright_red(),
            stats.timestamp_failures.to_string().bright_red().bold(),
            stats.complex_failures.to_string().bright_red().bold()
        );
    }
}

/// Print one line per chart series
pub fn print_report(report: &ImpedanceReport) {
    println!("\n{}", "Impedance Charts".bright_green().bold());
    for series in &report.series {
        let range = match series.value_range() {
            Some((lo, hi)) => format!("{:.4} .. {:.4}", lo, hi),
            None => "no finite values".to_string(),
        };
        println!(
            "  {} {} points over {} cycles, {} [{}]",
            format!("{}:", series.title).bright_cyan(),
            series.len().to_string().bright_white(),
            series.cycle_count(),
            range,
            series.y_label
        );
    }
}
