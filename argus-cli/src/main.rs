//! # Argus CLI
//!
//! Command-line interface for the Argus fraud-alert feed.
//!
//! This CLI provides commands for:
//! - Tailing the live or simulated alert feed
//! - Printing synthetic alerts
//! - Showing the effective configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use argus_core::config::ArgusConfig;
use argus_telemetry::logging::{LogConfig, WorkerGuard, init_logging};
use argus_telemetry::masking::SensitiveDataMasker;
use clap::{Parser, Subcommand};

use commands::{sample, watch};

/// Argus - real-time fraud alert feed
#[derive(Parser)]
#[command(name = "argus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (YAML, TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Tail the alert feed
    Watch(watch::WatchArgs),

    /// Print synthetic alerts as JSON lines
    Sample(sample::SampleArgs),

    /// Show version and effective configuration
    Info,
}

fn setup_logging(config: &ArgusConfig, verbose: bool) -> Result<Vec<WorkerGuard>> {
    let mut log_config = LogConfig::from(&config.logging);
    if verbose {
        log_config = log_config.with_level("debug");
    }
    init_logging(&log_config).context("Failed to initialise logging")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ArgusConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _guards = setup_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Watch(args) => watch::run(args, &config).await?,
        Commands::Sample(args) => sample::run(&args)?,
        Commands::Info => print_info(&config),
    }

    Ok(())
}

fn print_info(config: &ArgusConfig) {
    let masker = SensitiveDataMasker::new();
    let feed = &config.feed;

    println!("Argus Fraud Alert Feed");
    println!("======================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Feed:");
    println!("  Mode:               {}", feed.mode);
    println!("  URL:                {}", masker.mask_string(&feed.url));
    println!("  Reconnect interval: {} ms", feed.reconnect_interval_ms);
    println!("  Connect timeout:    {} ms", feed.connect_timeout_ms);
    println!("  Heartbeat interval: {} ms", feed.heartbeat_interval_ms);
    println!();
    println!("Simulation:");
    println!("  Interval:           {} ms", feed.simulation.interval_ms);
    println!("  Emit probability:   {}", feed.simulation.emit_probability);
    match feed.simulation.seed {
        Some(seed) => println!("  Seed:               {seed}"),
        None => println!("  Seed:               (random)"),
    }
    println!();
    println!("Logging:");
    println!("  Level:              {}", config.logging.level);
    println!("  Format:             {}", config.logging.format);
}
