//! Tail the alert feed.

use anyhow::{Context, Result};
use argus_core::config::{ArgusConfig, FeedConfig, FeedMode, Validatable};
use argus_core::types::{AlertRecord, Priority};
use argus_gateway::{AdapterOptions, ChannelConfig, EventChannel, RealtimeAlerts};
use argus_telemetry::masking::{Sensitive, SensitiveDataMasker};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

/// Arguments for the watch command
#[derive(Parser)]
pub struct WatchArgs {
    /// Connect to the live WebSocket feed
    #[arg(long, conflicts_with = "simulated")]
    pub live: bool,

    /// Use the simulated alert source
    #[arg(long)]
    pub simulated: bool,

    /// WebSocket URL (implies --live)
    #[arg(long, conflicts_with = "simulated")]
    pub url: Option<String>,

    /// Exit after printing this many alerts
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Only print alerts at or above this priority
    #[arg(short = 'p', long, default_value = "low")]
    pub min_priority: Priority,

    /// Print alerts as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Resolves the feed section after command-line overrides.
fn resolve_feed(args: &WatchArgs, config: &ArgusConfig) -> Result<FeedConfig> {
    let mut feed = config.feed.clone();
    if args.live || args.url.is_some() {
        feed.mode = FeedMode::Live;
    }
    if args.simulated {
        feed.mode = FeedMode::Simulated;
    }
    if let Some(url) = &args.url {
        feed.url.clone_from(url);
    }

    let resolved = ArgusConfig {
        feed,
        logging: config.logging.clone(),
    };
    resolved.validate().context("Invalid feed configuration")?;
    Ok(resolved.feed)
}

/// Watch the feed until the limit is reached or Ctrl-C.
///
/// # Errors
///
/// Returns error if the feed configuration is invalid or output fails.
pub async fn run(args: WatchArgs, config: &ArgusConfig) -> Result<()> {
    let feed = resolve_feed(&args, config)?;
    let channel = EventChannel::new(ChannelConfig::from(&feed));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let min_priority = args.min_priority;
    let adapter = RealtimeAlerts::new(channel.clone());
    adapter.activate(
        AdapterOptions::new()
            .subscriber_id("argus-cli")
            .on_new_alert(move |alert: &AlertRecord| {
                if alert.priority >= min_priority {
                    let _ = tx.send(alert.clone());
                }
            }),
    );

    info!(
        mode = %feed.mode,
        min_priority = %min_priority,
        limit = ?args.limit,
        "Watching alert feed"
    );

    let masker = SensitiveDataMasker::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut printed = 0usize;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            alert = rx.recv() => {
                let Some(alert) = alert else { break };
                println!("{}", format_alert(&alert, args.json, &masker)?);
                printed += 1;
                if args.limit.is_some_and(|limit| printed >= limit) {
                    break;
                }
            }
        }
    }

    adapter.deactivate();
    let stats = channel.stats();
    info!(
        printed,
        buffered = adapter.len(),
        events = stats.events_dispatched,
        dropped = stats.frames_dropped,
        connections = stats.connections_opened,
        "Watch finished"
    );

    Ok(())
}

fn format_alert(alert: &AlertRecord, json: bool, masker: &SensitiveDataMasker) -> Result<String> {
    if json {
        let line = serde_json::to_string(alert).context("Failed to encode alert")?;
        return Ok(masker.mask_string(&line).into_owned());
    }

    let tx = &alert.transaction;
    Ok(format!(
        "{} {:<8} {} {:<8} {:>12} {} -> {} score={:.2}",
        alert.created_at.format("%Y-%m-%d %H:%M:%S"),
        alert.priority,
        alert.id,
        tx.kind,
        tx.amount,
        Sensitive::new(&tx.name_orig),
        Sensitive::new(&tx.name_dest),
        alert.ml_score,
    ))
}
