//! Live WebSocket transport.

use super::{Frame, Transport, TransportSession};
use crate::config::ChannelConfig;
use argus_core::error::NetworkError;
use argus_telemetry::masking::SensitiveDataMasker;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket client transport.
///
/// Each [`open`](Transport::open) performs one connection attempt bounded by
/// the connect timeout. Sessions answer server pings and send their own
/// heartbeat pings; outbound application messages are never sent.
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    url: String,
    connect_timeout: Duration,
    heartbeat_interval: Duration,
}

impl WebSocketTransport {
    /// Creates a transport for `url` with default timings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = ChannelConfig::default();
        Self {
            url: url.into(),
            connect_timeout: defaults.connect_timeout(),
            heartbeat_interval: defaults.heartbeat_interval(),
        }
    }

    /// Creates a transport from channel configuration.
    #[must_use]
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self {
            url: config.url.clone(),
            connect_timeout: config.connect_timeout(),
            heartbeat_interval: config.heartbeat_interval(),
        }
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    fn check_url(&self) -> Result<(), NetworkError> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            Ok(())
        } else {
            Err(NetworkError::InvalidUrl {
                url: self.url.clone(),
                reason: "scheme must be ws:// or wss://".to_string(),
            })
        }
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    fn name(&self) -> &'static str {
        "websocket"
    }

    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn open(&self) -> Result<Box<dyn TransportSession>, NetworkError> {
        self.check_url()?;

        #[allow(clippy::cast_possible_truncation)]
        let (stream, _) = timeout(self.connect_timeout, connect_async(self.url.as_str()))
            .await
            .map_err(|_| NetworkError::Timeout {
                timeout_ms: self.connect_timeout.as_millis() as u64,
            })?
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!(
            url = %SensitiveDataMasker::new().mask_string(&self.url),
            "WebSocket connected"
        );

        let period = self.heartbeat_interval.max(Duration::from_millis(1));
        let mut heartbeat = interval_at(Instant::now() + period, period);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Box::new(WebSocketSession { stream, heartbeat }))
    }
}

struct WebSocketSession {
    stream: WsStream,
    heartbeat: Interval,
}

enum Step {
    Inbound(Option<Result<Message, tokio_tungstenite::tungstenite::Error>>),
    Heartbeat,
}

#[async_trait]
impl TransportSession for WebSocketSession {
    async fn next_frame(&mut self) -> Option<Result<Frame, NetworkError>> {
        loop {
            let step = tokio::select! {
                msg = self.stream.next() => Step::Inbound(msg),
                _ = self.heartbeat.tick() => Step::Heartbeat,
            };

            match step {
                Step::Inbound(None) => return None,
                Step::Inbound(Some(Err(e))) => {
                    return Some(Err(NetworkError::WebSocket {
                        reason: e.to_string(),
                    }));
                }
                Step::Inbound(Some(Ok(msg))) => match msg {
                    Message::Text(text) => return Some(Ok(Frame::Text(text))),
                    Message::Binary(data) => return Some(Ok(Frame::Binary(data))),
                    Message::Ping(data) => {
                        if let Err(e) = self.stream.send(Message::Pong(data)).await {
                            warn!(error = %e, "Failed to send pong");
                        }
                    }
                    Message::Pong(_) => debug!("Pong received"),
                    Message::Close(frame) => {
                        info!(frame = ?frame, "Server sent close frame");
                        return None;
                    }
                    Message::Frame(_) => {}
                },
                Step::Heartbeat => {
                    if let Err(e) = self.stream.send(Message::Ping(Vec::new())).await {
                        warn!(error = %e, "Failed to send ping");
                    } else {
                        debug!("Ping sent");
                    }
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "WebSocket close failed");
        }
    }
}
