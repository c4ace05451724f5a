//! Timer-driven synthetic alert source.

use super::{AlertGenerator, Frame, Transport, TransportSession};
use crate::config::ChannelConfig;
use crate::event::Event;
use argus_core::error::NetworkError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info, trace, warn};

const ENDPOINT: &str = "simulated://alerts";

/// Transport that emits generated `alert_created` frames on a timer.
///
/// Every tick emits one alert with probability `emit_probability`. Frames are
/// JSON text and take the same decode path as live frames. Opening never fails.
#[derive(Debug)]
pub struct SimulatedTransport {
    interval: Duration,
    emit_probability: f64,
    seed: Option<u64>,
    sessions: AtomicU64,
}

impl SimulatedTransport {
    /// Creates a simulated transport.
    #[must_use]
    pub fn new(interval: Duration, emit_probability: f64) -> Self {
        Self {
            interval,
            emit_probability,
            seed: None,
            sessions: AtomicU64::new(0),
        }
    }

    /// Makes generated alerts reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Creates a simulated transport from channel configuration.
    #[must_use]
    pub fn from_config(config: &ChannelConfig) -> Self {
        let transport = Self::new(config.simulation_interval(), config.emit_probability);
        match config.seed {
            Some(seed) => transport.with_seed(seed),
            None => transport,
        }
    }
}

#[async_trait]
impl Transport for SimulatedTransport {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn endpoint(&self) -> &str {
        ENDPOINT
    }

    async fn open(&self) -> Result<Box<dyn TransportSession>, NetworkError> {
        let session = self.sessions.fetch_add(1, Ordering::Relaxed);
        // A fresh seed per session so a reconnect does not replay old alerts.
        let generator = self.seed.map_or_else(AlertGenerator::new, |seed| {
            AlertGenerator::with_seed(seed.wrapping_add(session))
        });

        let period = self.interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_ms = period.as_millis(),
            probability = self.emit_probability,
            "Simulated alert source started"
        );

        Ok(Box::new(SimulatedSession {
            ticker,
            generator,
            emit_probability: self.emit_probability,
        }))
    }
}

struct SimulatedSession {
    ticker: Interval,
    generator: AlertGenerator,
    emit_probability: f64,
}

#[async_trait]
impl TransportSession for SimulatedSession {
    async fn next_frame(&mut self) -> Option<Result<Frame, NetworkError>> {
        loop {
            self.ticker.tick().await;

            if !self.generator.should_emit(self.emit_probability) {
                trace!("Simulated tick without alert");
                continue;
            }

            let alert = self.generator.next_alert();
            debug!(alert_id = %alert.id, priority = %alert.priority, "Simulated alert generated");

            match Event::AlertCreated(alert).encode() {
                Ok(text) => return Some(Ok(Frame::Text(text))),
                Err(e) => warn!(error = %e, "Failed to encode simulated alert"),
            }
        }
    }

    async fn close(&mut self) {
        debug!("Simulated alert source stopped");
    }
}
