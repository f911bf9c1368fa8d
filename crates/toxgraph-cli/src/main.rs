mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("🚀 toxgraph CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        configure_threads(num_threads)?;
    }

    let progress = if cli.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };

    let command_result = match cli.command {
        Commands::Analyze(args) => {
            info!("Dispatching to 'analyze' command.");
            commands::analyze::run(args, progress)
        }
        Commands::Dipole(args) => {
            info!("Dispatching to 'dipole' command.");
            commands::dipole::run(args)
        }
        Commands::Segment(args) => {
            info!("Dispatching to 'segment' command.");
            commands::segment::run(args)
        }
        Commands::Disulfides(args) => {
            info!("Dispatching to 'disulfides' command.");
            commands::disulfides::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}

#[cfg(feature = "parallel")]
fn configure_threads(num_threads: usize) -> Result<()> {
    info!(
        "Setting Rayon global thread pool to {} threads.",
        num_threads
    );
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| {
            crate::error::CliError::Other(anyhow::anyhow!(
                "Failed to build global thread pool: {}",
                e
            ))
        })
}

#[cfg(not(feature = "parallel"))]
fn configure_threads(num_threads: usize) -> Result<()> {
    tracing::warn!(
        "Ignoring --threads {}: this build does not include the `parallel` feature.",
        num_threads
    );
    Ok(())
}
