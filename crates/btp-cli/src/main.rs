//! # btp CLI entry point
//!
//! Parses command-line arguments, loads the configuration and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use btp_cli::avenant::{run_avenant, AvenantArgs};
use btp_cli::situation::{run_situation, SituationArgs};
use btp_cli::{load_config, run_config};

/// BTP progress billing
///
/// Computes payment certificates (situations de travaux) and contract
/// amendments from job-site snapshots and renders them as printable
/// documents.
#[derive(Parser, Debug)]
#[command(name = "btp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute and render a payment certificate.
    Situation(SituationArgs),

    /// Compute and render a contract amendment.
    Avenant(AvenantArgs),

    /// Print the effective configuration.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Situation(args) => run_situation(args, &config),
        Commands::Avenant(args) => run_avenant(args, &config),
        Commands::Config => run_config(&config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
