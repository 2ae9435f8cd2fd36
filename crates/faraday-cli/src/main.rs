//! Faraday command-line interface.
//!
//! Run time-domain simulations from TOML configuration files:
//! ```sh
//! faraday-cli run job.toml
//! faraday-cli validate job.toml
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faraday-cli")]
#[command(about = "Faraday: Conformal FIT Time-Domain Solver")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Faraday FIT Solver");
            println!("==================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let (solver, result) = runner::run_simulation(&job)?;
            println!(
                "Simulation complete: {} steps, energy {:.6e} J",
                result.steps, result.final_energy
            );

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_probe {
                let csv_path = out_dir.join("probe.csv");
                runner::write_probe_csv(&result.probe, &csv_path, &job)?;
            }

            if job.output.save_json {
                let json_path = out_dir.join("probe.json");
                runner::write_probe_json(&result.probe, &json_path)?;
            }

            if job.output.save_slice {
                let slice_path = out_dir.join("slice.csv");
                runner::write_slice_csv(&solver, &slice_path)?;
            }

            Ok(())
        }
        Commands::Validate { config } => {
            let _job = config::load_config(&config)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
    }
}
