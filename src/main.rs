use anyhow::Context;
use battery_processor::cli::{self, Args};
use battery_processor::{BatteryPipeline, ImpedanceReport};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    cli::setup_logging(args).context("Failed to initialise logging")?;

    let config = args.to_config();
    let pipeline = BatteryPipeline::new(config).context("Invalid dataset layout")?;
    let output = pipeline.run().context("Processing failed")?;
    cli::print_summary(&output);

    let report =
        ImpedanceReport::from_frame(&output.impedance).context("Failed to build impedance charts")?;
    cli::print_report(&report);

    Ok(())
}
