//! Event channel configuration.

use argus_core::config::{FeedConfig, FeedMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which transport the channel opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// WebSocket connection to `url`.
    Live,
    /// Timer-driven synthetic alerts.
    #[default]
    Simulated,
}

impl From<FeedMode> for TransportMode {
    fn from(mode: FeedMode) -> Self {
        match mode {
            FeedMode::Live => Self::Live,
            FeedMode::Simulated => Self::Simulated,
        }
    }
}

/// Configuration for an [`EventChannel`](crate::EventChannel).
///
/// Fixed for the lifetime of the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Upstream WebSocket endpoint.
    #[serde(default = "default_url")]
    pub url: String,

    /// Transport selection.
    #[serde(default)]
    pub mode: TransportMode,

    /// Fixed delay before each reconnection attempt.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Heartbeat/ping interval in milliseconds.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Tick interval of the simulated source.
    #[serde(default = "default_simulation_interval_ms")]
    pub simulation_interval_ms: u64,

    /// Probability that a simulated tick produces an alert.
    #[serde(default = "default_emit_probability")]
    pub emit_probability: f64,

    /// Seed for the simulated source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_url() -> String {
    "ws://localhost:8000/ws/alerts".to_string()
}

fn default_reconnect_interval_ms() -> u64 {
    5_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

fn default_simulation_interval_ms() -> u64 {
    30_000
}

fn default_emit_probability() -> f64 {
    0.5
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            mode: TransportMode::default(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            simulation_interval_ms: default_simulation_interval_ms(),
            emit_probability: default_emit_probability(),
            seed: None,
        }
    }
}

impl From<&FeedConfig> for ChannelConfig {
    fn from(feed: &FeedConfig) -> Self {
        Self {
            url: feed.url.clone(),
            mode: feed.mode.into(),
            reconnect_interval_ms: feed.reconnect_interval_ms,
            connect_timeout_ms: feed.connect_timeout_ms,
            heartbeat_interval_ms: feed.heartbeat_interval_ms,
            simulation_interval_ms: feed.simulation.interval_ms,
            emit_probability: feed.simulation.emit_probability,
            seed: feed.simulation.seed,
        }
    }
}

impl ChannelConfig {
    /// Creates a new builder for `ChannelConfig`.
    #[must_use]
    pub fn builder() -> ChannelConfigBuilder {
        ChannelConfigBuilder::default()
    }

    /// Returns the reconnect interval as a Duration.
    #[must_use]
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    /// Returns the connection timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the heartbeat interval as a Duration.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    /// Returns the simulated tick interval as a Duration.
    #[must_use]
    pub fn simulation_interval(&self) -> Duration {
        Duration::from_millis(self.simulation_interval_ms)
    }
}

/// Builder for `ChannelConfig`.
#[derive(Debug, Default)]
pub struct ChannelConfigBuilder {
    url: Option<String>,
    mode: Option<TransportMode>,
    reconnect_interval_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
    heartbeat_interval_ms: Option<u64>,
    simulation_interval_ms: Option<u64>,
    emit_probability: Option<f64>,
    seed: Option<u64>,
}

#[allow(clippy::cast_possible_truncation)]
impl ChannelConfigBuilder {
    /// Sets the WebSocket URL and selects the live transport.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.mode = Some(TransportMode::Live);
        self
    }

    /// Selects the simulated transport.
    #[must_use]
    pub fn simulated(mut self) -> Self {
        self.mode = Some(TransportMode::Simulated);
        self
    }

    /// Sets the transport mode.
    #[must_use]
    pub fn mode(mut self, mode: TransportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the fixed reconnect interval.
    #[must_use]
    pub fn reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Sets the simulated tick interval.
    #[must_use]
    pub fn simulation_interval(mut self, interval: Duration) -> Self {
        self.simulation_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    /// Sets the probability that a simulated tick emits an alert.
    #[must_use]
    pub fn emit_probability(mut self, probability: f64) -> Self {
        self.emit_probability = Some(probability);
        self
    }

    /// Seeds the simulated source.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the `ChannelConfig`.
    #[must_use]
    pub fn build(self) -> ChannelConfig {
        ChannelConfig {
            url: self.url.unwrap_or_else(default_url),
            mode: self.mode.unwrap_or_default(),
            reconnect_interval_ms: self
                .reconnect_interval_ms
                .unwrap_or_else(default_reconnect_interval_ms),
            connect_timeout_ms: self
                .connect_timeout_ms
                .unwrap_or_else(default_connect_timeout_ms),
            heartbeat_interval_ms: self
                .heartbeat_interval_ms
                .unwrap_or_else(default_heartbeat_interval_ms),
            simulation_interval_ms: self
                .simulation_interval_ms
                .unwrap_or_else(default_simulation_interval_ms),
            emit_probability: self
                .emit_probability
                .unwrap_or_else(default_emit_probability),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::config::ArgusConfig;

    #[test]
    fn test_config_defaults() {
        let config = ChannelConfig::default();

        assert_eq!(config.url, "ws://localhost:8000/ws/alerts");
        assert_eq!(config.mode, TransportMode::Simulated);
        assert_eq!(config.reconnect_interval(), Duration::from_secs(5));
        assert_eq!(config.simulation_interval(), Duration::from_secs(30));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ChannelConfig::builder()
            .url("wss://alerts.internal/ws")
            .reconnect_interval(Duration::from_secs(2))
            .connect_timeout(Duration::from_secs(15))
            .build();

        assert_eq!(config.mode, TransportMode::Live);
        assert_eq!(config.url, "wss://alerts.internal/ws");
        assert_eq!(config.reconnect_interval_ms, 2_000);
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.heartbeat_interval_ms, 30_000);
    }

    #[test]
    fn test_simulated_builder() {
        let config = ChannelConfig::builder()
            .simulated()
            .simulation_interval(Duration::from_secs(1))
            .emit_probability(1.0)
            .seed(42)
            .build();

        assert_eq!(config.mode, TransportMode::Simulated);
        assert_eq!(config.simulation_interval_ms, 1_000);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_from_feed_config() {
        let mut settings = ArgusConfig::default();
        settings.feed.mode = FeedMode::Live;
        settings.feed.url = "ws://monitor:9000/ws/alerts".to_string();
        settings.feed.reconnect_interval_ms = 7_500;
        settings.feed.simulation.seed = Some(3);

        let config = ChannelConfig::from(&settings.feed);
        assert_eq!(config.mode, TransportMode::Live);
        assert_eq!(config.url, "ws://monitor:9000/ws/alerts");
        assert_eq!(config.reconnect_interval(), Duration::from_millis(7_500));
        assert_eq!(config.seed, Some(3));
    }
}
