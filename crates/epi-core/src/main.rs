//! Vaccination-Opinion Epidemic Simulator
//!
//! Runs coupled SIR(V) epidemics and opinion dynamics on a physical and an
//! information network.
//!
//! # Example
//!
//! ```bash
//! # One run with the settings in vaxnet.toml
//! vaxnet run --config vaxnet.toml --output output/run.json
//!
//! # 20 static/dynamic replicate pairs
//! vaxnet replicates --replicates 20 --output output/replicates.jsonl
//!
//! # Full (r, pol) grid from the [experiment] section
//! vaxnet sweep --config vaxnet.toml
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use epi_core::config::DEFAULT_CONFIG_PATH;
use epi_core::output::{write_run, RecordLogger};
use epi_core::{run_replicates, run_single, sweep, SimConfig};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "vaxnet")]
#[command(version, about = "Coupled epidemic and vaccination-opinion simulation")]
struct Args {
    /// Path to the TOML configuration. Defaults apply when omitted and
    /// vaxnet.toml does not exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the hard tick cap of every run
    #[arg(long, global = true)]
    max_ticks: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single simulation and write its record as JSON
    Run {
        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Output file for the run record
        #[arg(long, default_value = "output/run.json")]
        output: PathBuf,
    },
    /// Run static/dynamic replicate pairs with the configured parameters
    Replicates {
        /// Number of replicates
        #[arg(long)]
        replicates: Option<usize>,

        /// Master seed the replicate seeds are drawn from
        #[arg(long)]
        master_seed: Option<u64>,

        /// Output JSONL file
        #[arg(long, default_value = "output/replicates.jsonl")]
        output: PathBuf,
    },
    /// Run replicates for every (r, pol) pair of the experiment grid
    Sweep {
        /// Output JSONL file; defaults to <output_dir>/sweep.jsonl
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,epi_core=info")),
        )
        .init();

    let args = Args::parse();
    match execute(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: Option<&Path>,
    max_ticks: Option<u64>,
) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => SimConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => SimConfig::from_file(DEFAULT_CONFIG_PATH)?,
        None => SimConfig::default(),
    };
    if let Some(max_ticks) = max_ticks {
        config.run.max_ticks = max_ticks;
    }
    config.validate()?;
    Ok(config)
}

fn execute(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let load = || load_config(args.config.as_deref(), args.max_ticks);

    match args.command {
        Command::DefaultConfig => {
            print!("{}", SimConfig::default().to_toml()?);
        }
        Command::Run { seed, output } => {
            let mut config = load()?;
            if let Some(seed) = seed {
                config.run.seed = seed;
            }
            let record = run_single(&config)?;

            write_run(&output, &record)?;
            println!("Seed: {} (run seed {})", config.run.seed, record.summary.seed);
            println!("Ticks: {}", record.summary.ticks);
            println!(
                "Attack rate: {:.3} ({} of {})",
                record.summary.attack_rate, record.summary.total_infected, record.summary.population
            );
            if let Some((tick, infectious)) = record.peak() {
                println!("Peak: {} infectious at tick {}", infectious, tick);
            }
            println!("Wrote {}", output.display());
        }
        Command::Replicates {
            replicates,
            master_seed,
            output,
        } => {
            let config = load()?;
            let count = replicates.unwrap_or(config.experiment.replicates);
            let master_seed = master_seed.unwrap_or(config.experiment.master_seed);
            info!(count, master_seed, "running replicates");

            let records = run_replicates(&config, count, master_seed)?;
            let mut logger = RecordLogger::new(&output)?;
            logger.log_batch(&records)?;
            logger.flush()?;
            println!("Wrote {} replicates to {}", logger.record_count(), output.display());
        }
        Command::Sweep { output } => {
            let config = load()?;
            let output = output.unwrap_or_else(|| config.experiment.output_dir.join("sweep.jsonl"));
            let records = sweep(&config)?;
            let mut logger = RecordLogger::new(&output)?;
            logger.log_batch(&records)?;
            logger.flush()?;
            println!("Wrote {} replicates to {}", logger.record_count(), output.display());
        }
    }
    Ok(())
}
