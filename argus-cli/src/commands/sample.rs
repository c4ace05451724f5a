//! Print synthetic alerts.

use anyhow::{Context, Result};
use argus_core::types::Priority;
use argus_gateway::Event;
use argus_gateway::transport::AlertGenerator;
use clap::Parser;

/// Arguments for the sample command
#[derive(Parser)]
pub struct SampleArgs {
    /// Number of alerts to print
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fix the priority instead of drawing it at random
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Wrap each alert in an `alert_created` event frame
    #[arg(long)]
    pub event: bool,
}

/// Print generated alerts, one JSON document per line.
///
/// # Errors
///
/// Returns error if an alert cannot be encoded.
pub fn run(args: &SampleArgs) -> Result<()> {
    for line in render(args)? {
        println!("{line}");
    }
    Ok(())
}

fn render(args: &SampleArgs) -> Result<Vec<String>> {
    let mut generator = args
        .seed
        .map_or_else(AlertGenerator::new, AlertGenerator::with_seed);

    (0..args.count)
        .map(|_| {
            let alert = match args.priority {
                Some(priority) => generator.next_alert_with_priority(priority),
                None => generator.next_alert(),
            };
            if args.event {
                Event::AlertCreated(alert)
                    .encode()
                    .context("Failed to encode event")
            } else {
                serde_json::to_string(&alert).context("Failed to encode alert")
            }
        })
        .collect()
}
