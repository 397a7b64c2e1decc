//! # skladno CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skl_cli::alerts::{run_alerts, AlertsArgs};
use skl_cli::check::{run_check, CheckArgs};
use skl_cli::serve::{run_serve, ServeArgs};

/// Skladno compliance stack CLI.
///
/// Aggregates compliance registers (security incidents, whistleblower
/// reports, erasure requests, software licenses) into a ranked
/// needs-attention alert feed, checks record files against register
/// invariants, and runs the HTTP API server.
#[derive(Parser, Debug)]
#[command(name = "skladno", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate the alert feed from a record snapshot and print it as JSON.
    Alerts(AlertsArgs),

    /// Validate a record snapshot file against register invariants.
    Check(CheckArgs),

    /// Run the HTTP API server.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Alerts(args) => run_alerts(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Serve(args) => run_serve(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
