//! Connection state management.

#![allow(clippy::redundant_pub_crate)]

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Connection state of an event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// Never connected.
    Disconnected,
    /// Opening the transport.
    Connecting,
    /// Transport open, events flowing.
    Connected,
    /// Connection lost, a reconnect timer is pending.
    Reconnecting,
    /// Disconnected on request.
    Closed,
}

impl ConnectionState {
    /// Returns true if the connection is active.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true if no session is running.
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Closed)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Reconnecting => write!(f, "Reconnecting"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Internal state tracking for the event channel.
#[derive(Debug)]
pub(crate) struct InternalState {
    /// Current connection state.
    pub state: ConnectionState,
    /// Consecutive reconnection attempts since the last successful open.
    pub reconnect_attempts: u32,
    /// Number of transports opened successfully.
    pub connections_opened: u64,
}

impl Default for InternalState {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_attempts: 0,
            connections_opened: 0,
        }
    }
}

impl InternalState {
    /// Creates a new internal state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a transport open as in flight.
    pub fn mark_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
    }

    /// Marks the connection as connected.
    pub fn mark_connected(&mut self) {
        self.state = ConnectionState::Connected;
        self.reconnect_attempts = 0;
        self.connections_opened += 1;
    }

    /// Marks the connection as waiting for a reconnect.
    pub fn mark_reconnecting(&mut self) {
        self.state = ConnectionState::Reconnecting;
        self.reconnect_attempts += 1;
    }

    /// Marks the connection as closed on request.
    pub fn mark_closed(&mut self) {
        self.state = ConnectionState::Closed;
        self.reconnect_attempts = 0;
    }
}

/// Lock-free counters updated on the dispatch path.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub events_dispatched: AtomicU64,
    pub frames_dropped: AtomicU64,
    pub subscriber_panics: AtomicU64,
}

impl Counters {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

/// Point-in-time snapshot of channel activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    /// Current connection state.
    pub state: ConnectionState,
    /// Registered subscribers.
    pub subscribers: usize,
    /// Transports opened successfully.
    pub connections_opened: u64,
    /// Consecutive reconnection attempts since the last successful open.
    pub reconnect_attempts: u32,
    /// Events fanned out, including status events.
    pub events_dispatched: u64,
    /// Inbound frames dropped as malformed.
    pub frames_dropped: u64,
    /// Subscriber callbacks that panicked.
    pub subscriber_panics: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_display() {
        assert_eq!(ConnectionState::Disconnected.to_string(), "Disconnected");
        assert_eq!(ConnectionState::Connected.to_string(), "Connected");
        assert_eq!(ConnectionState::Reconnecting.to_string(), "Reconnecting");
    }

    #[test]
    fn test_connection_state_checks() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Reconnecting.is_connected());

        assert!(ConnectionState::Disconnected.is_inactive());
        assert!(ConnectionState::Closed.is_inactive());
        assert!(!ConnectionState::Reconnecting.is_inactive());
    }

    #[test]
    fn test_internal_state_transitions() {
        let mut state = InternalState::new();
        assert_eq!(state.state, ConnectionState::Disconnected);

        state.mark_connecting();
        state.mark_reconnecting();
        state.mark_reconnecting();
        assert_eq!(state.state, ConnectionState::Reconnecting);
        assert_eq!(state.reconnect_attempts, 2);

        state.mark_connected();
        assert_eq!(state.state, ConnectionState::Connected);
        assert_eq!(state.reconnect_attempts, 0);
        assert_eq!(state.connections_opened, 1);

        state.mark_closed();
        assert_eq!(state.state, ConnectionState::Closed);
    }

    #[test]
    fn test_counters() {
        let counters = Counters::default();
        Counters::incr(&counters.frames_dropped);
        Counters::incr(&counters.frames_dropped);
        assert_eq!(Counters::get(&counters.frames_dropped), 2);
        assert_eq!(Counters::get(&counters.events_dispatched), 0);
    }
}
