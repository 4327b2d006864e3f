//! Replicate Analyzer
//!
//! Reduces a JSONL file of replicate records to the mean/std CSV table.
//!
//! ```bash
//! vaxnet-analyze output/sweep.jsonl --output output/SIR_simulation.csv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use epi_analysis::{
    estimate_r0, growth_rate, read_replicates, summarize_grid, AnalysisError, CsvWriter,
};
use epi_events::NetKind;

#[derive(Parser, Debug)]
#[command(name = "vaxnet-analyze")]
#[command(version, about = "Summarize replicate records into a CSV table")]
struct Args {
    /// JSONL file written by `vaxnet replicates` or `vaxnet sweep`
    input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "output/SIR_simulation.csv")]
    output: PathBuf,

    /// First tick of the early-growth fit
    #[arg(long, default_value_t = 0)]
    fit_start: usize,

    /// Number of ticks in the early-growth fit
    #[arg(long, default_value_t = 6)]
    fit_points: usize,

    /// Infectious period used to turn the growth rate into R0
    #[arg(long, default_value_t = 7.0)]
    infectious_period: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,epi_analysis=info")),
        )
        .init();

    let args = Args::parse();
    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> Result<(), AnalysisError> {
    let records = read_replicates(&args.input)?;
    info!(records = records.len(), input = %args.input.display(), "loaded replicates");

    let summaries = summarize_grid(&records)?;
    let mut writer = CsvWriter::create(&args.output)?;
    for summary in &summaries {
        writer.write_summary(summary)?;
        for kind in [NetKind::Static, NetKind::Dynamic] {
            let curve = &summary.kind(kind).mean_infectious;
            if let Some((_, g)) = growth_rate(curve, args.fit_start, args.fit_points) {
                info!(
                    r = summary.r,
                    pol = summary.pol,
                    net_type = kind.as_str(),
                    growth = g,
                    r0 = estimate_r0(g, args.infectious_period),
                    "early growth"
                );
            }
        }
    }
    writer.flush()?;

    println!(
        "Wrote {} rows for {} parameter points to {}",
        writer.row_count(),
        summaries.len(),
        args.output.display()
    );
    Ok(())
}
