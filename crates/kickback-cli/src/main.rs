//! Kickback Command-Line Interface
//!
//! Recovers a hidden bit string with one oracle query, on the local
//! simulator or on AWS Braket.
//!
//! ```text
//!   q0 ─ H ─────●──────────── H ─ M ─→ s0
//!   q1 ─ H ─────┼─────●────── H ─ M ─→ s1
//!   q2 ─ Ry ────X─────X── X ─ H ─ M ─→ 1
//!
//!                 K I C K B A C K
//!        "the oracle answers with its phase"
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{backends, circuit, run, version};
use config::Config;

/// Kickback - Bernstein-Vazirani on simulators and quantum hardware
#[derive(Parser)]
#[command(name = "kickback")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.kickback/config.yaml)
    #[arg(long, global = true, env = "KICKBACK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover a secret bit string on a backend
    Run {
        /// Secret bit string, e.g. 1011
        secret: String,

        /// Backend to use (simulator, sv1, rigetti, ionq, iqm-garnet, or a device ARN)
        #[arg(short, long)]
        backend: Option<String>,

        /// Number of shots
        #[arg(short, long)]
        shots: Option<u32>,

        /// Give up waiting after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Write the histogram as SVG
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Write the execution result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print the circuit for a secret as a gate list, diagram and OpenQASM
    Circuit {
        /// Secret bit string, e.g. 1011
        secret: String,

        /// OpenQASM dialect (qasm3, braket)
        #[arg(long, default_value = "qasm3")]
        dialect: String,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run {
            secret,
            backend,
            shots,
            timeout,
            svg,
            json,
        } => match Config::load(cli.config.as_deref()) {
            Ok(config) => {
                run::execute(
                    &secret,
                    backend.as_deref(),
                    shots,
                    timeout,
                    svg.as_deref(),
                    json.as_deref(),
                    &config,
                )
                .await
            }
            Err(e) => Err(e),
        },

        Commands::Circuit { secret, dialect } => circuit::execute(&secret, &dialect),

        Commands::Backends => match Config::load(cli.config.as_deref()) {
            Ok(config) => backends::execute(&config).await,
            Err(e) => Err(e),
        },

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
