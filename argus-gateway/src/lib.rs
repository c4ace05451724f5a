//! # Argus Gateway
//!
//! Real-time alert distribution for the Argus fraud-alert feed.
//!
//! This crate provides:
//! - [`EventChannel`]: one logical connection to the upstream alert source,
//!   fanned out to any number of named subscribers, with fixed-interval
//!   reconnection after involuntary disconnects
//! - [`RealtimeAlerts`]: a per-consumer adapter that buffers new alerts
//!   newest-first and tracks the connection flag
//! - Transports: a live WebSocket client and a timer-driven simulated source
//!
//! # Architecture
//!
//! - `event` - the wire-level event union
//! - `config` - channel configuration and builder
//! - `transport` - the `Transport` seam and its implementations
//! - `channel` - subscriber registry, fan-out and the connection driver
//! - `adapter` - the subscription adapter
//!
//! # Example
//!
//! ```no_run
//! use argus_gateway::{AdapterOptions, ChannelConfig, EventChannel, RealtimeAlerts};
//!
//! # async fn run() {
//! let channel = EventChannel::new(ChannelConfig::builder().simulated().build());
//! let alerts = RealtimeAlerts::new(channel.clone());
//! alerts.activate(AdapterOptions::new().on_new_alert(|alert| {
//!     println!("{} {}", alert.id, alert.priority);
//! }));
//! // ...
//! alerts.deactivate();
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

/// Event union carried on the feed
pub mod event;

/// Channel configuration
pub mod config;

/// Connection state tracking
pub mod state;

/// Transport implementations
pub mod transport;

/// Event channel and subscriber fan-out
pub mod channel;

/// Per-consumer subscription adapter
pub mod adapter;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::{AdapterOptions, AlertCallback, RealtimeAlerts};
pub use channel::{EventCallback, EventChannel, SubscriptionHandle};
pub use config::{ChannelConfig, ChannelConfigBuilder, TransportMode};
pub use event::{ConnectionStatus, Event};
pub use state::{ChannelStats, ConnectionState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapter::{AdapterOptions, RealtimeAlerts};
    pub use crate::channel::{EventChannel, SubscriptionHandle};
    pub use crate::config::{ChannelConfig, TransportMode};
    pub use crate::event::{ConnectionStatus, Event};
    pub use crate::state::{ChannelStats, ConnectionState};
    pub use crate::transport::{
        AlertGenerator, Frame, SimulatedTransport, Transport, TransportSession,
        WebSocketTransport, transport_from_config,
    };
}
