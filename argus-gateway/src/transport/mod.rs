//! Transports feeding the event channel.
//!
//! A [`Transport`] opens sessions; a [`TransportSession`] yields inbound
//! frames until the peer goes away. The channel owns reconnection, so
//! transports never retry on their own.
//!
//! Two implementations are provided:
//! - [`WebSocketTransport`] - live connection to the monitoring backend
//! - [`SimulatedTransport`] - synthetic alerts on a timer, for development

mod generator;
mod simulated;
mod websocket;

pub use generator::AlertGenerator;
pub use simulated::SimulatedTransport;
pub use websocket::WebSocketTransport;

use crate::config::{ChannelConfig, TransportMode};
use crate::event::Event;
use argus_core::error::{DataError, NetworkError};
use async_trait::async_trait;
use std::sync::Arc;

/// One inbound message from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Text frame, expected to hold a JSON event.
    Text(String),
    /// Binary frame; accepted when it is UTF-8 JSON.
    Binary(Vec<u8>),
}

impl Frame {
    /// Decodes the frame into a validated event.
    ///
    /// # Errors
    ///
    /// Returns a `DataError` for undecodable, unknown or invalid payloads.
    pub fn decode(&self) -> Result<Event, DataError> {
        match self {
            Self::Text(text) => Event::decode(text),
            Self::Binary(data) => match std::str::from_utf8(data) {
                Ok(text) => Event::decode(text),
                Err(_) => Err(DataError::UnsupportedFrame {
                    kind: "binary".to_string(),
                }),
            },
        }
    }
}

/// Source of transport sessions.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Endpoint description used in logs.
    fn endpoint(&self) -> &str;

    /// Opens a new session.
    async fn open(&self) -> Result<Box<dyn TransportSession>, NetworkError>;
}

/// An open, receive-only session.
#[async_trait]
pub trait TransportSession: Send {
    /// Waits for the next inbound frame.
    ///
    /// Returns `None` once the peer has closed the session.
    async fn next_frame(&mut self) -> Option<Result<Frame, NetworkError>>;

    /// Closes the session.
    async fn close(&mut self);
}

/// Builds the transport selected by the configuration.
#[must_use]
pub fn transport_from_config(config: &ChannelConfig) -> Arc<dyn Transport> {
    match config.mode {
        TransportMode::Live => Arc::new(WebSocketTransport::from_config(config)),
        TransportMode::Simulated => Arc::new(SimulatedTransport::from_config(config)),
    }
}
