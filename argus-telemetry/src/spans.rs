//! Span definitions for tracing.
//!
//! Provides pre-defined spans for the feed:
//! - Connection sessions
//! - Event dispatch
//! - Adapter lifecycle

use crate::masking::SensitiveDataMasker;
use tracing::{Span, info_span, trace_span};

/// Create a span for one connection session of the event channel.
///
/// Tokens in the URL query string are masked.
///
/// # Example
///
/// ```
/// use argus_telemetry::spans::connection_span;
///
/// let span = connection_span("ws://localhost:8000/ws/alerts", "websocket");
/// let _guard = span.enter();
/// // ... open the transport
/// ```
#[must_use]
pub fn connection_span(url: &str, transport: &str) -> Span {
    let masker = SensitiveDataMasker::new();
    info_span!(
        "connection",
        url = %masker.mask_string(url),
        transport = %transport,
        otel.kind = "client"
    )
}

/// Create a span for fanning out one event to all subscribers.
#[must_use]
pub fn dispatch_span(event_type: &str, subscribers: usize) -> Span {
    trace_span!(
        "dispatch",
        event_type = %event_type,
        subscribers = subscribers
    )
}

/// Create a span for a subscription adapter.
#[must_use]
pub fn adapter_span(subscriber_id: &str) -> Span {
    info_span!("adapter", subscriber = %subscriber_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    fn init_test_subscriber() {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    }

    #[test]
    fn test_connection_span() {
        init_test_subscriber();
        let span = connection_span("wss://alerts.internal/ws?token=abcdef123456", "websocket");
        let _guard = span.enter();
    }

    #[test]
    fn test_dispatch_span() {
        init_test_subscriber();
        let span = dispatch_span("alert_created", 3);
        let _guard = span.enter();
    }

    #[test]
    fn test_adapter_span() {
        init_test_subscriber();
        let span = adapter_span("realtime-alerts-1");
        let _guard = span.enter();
    }
}
