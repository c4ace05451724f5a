//! Feed event types and frame decoding.

use argus_core::error::DataError;
use argus_core::types::AlertRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event delivered to channel subscribers.
///
/// On the wire every event is an object `{"type": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// A new alert was raised.
    AlertCreated(AlertRecord),
    /// An existing alert changed.
    AlertUpdated(AlertRecord),
    /// The channel connected or lost its connection.
    ConnectionStatus(ConnectionStatus),
}

/// Payload of a connection status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the channel is now connected.
    pub connected: bool,
    /// When the transition happened.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates a connection status event stamped with the current time.
    #[must_use]
    pub fn connection_status(connected: bool) -> Self {
        Self::ConnectionStatus(ConnectionStatus {
            connected,
            timestamp: Utc::now(),
        })
    }

    /// Returns the wire name of this event's type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AlertCreated(_) => "alert_created",
            Self::AlertUpdated(_) => "alert_updated",
            Self::ConnectionStatus(_) => "connection_status",
        }
    }

    /// Returns the alert carried by this event, if any.
    #[must_use]
    pub const fn alert(&self) -> Option<&AlertRecord> {
        match self {
            Self::AlertCreated(alert) | Self::AlertUpdated(alert) => Some(alert),
            Self::ConnectionStatus(_) => None,
        }
    }

    /// Decodes and validates one inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ParseFailed` when the text is not a known event and
    /// `DataError::ValidationFailed` when the carried alert is inconsistent.
    pub fn decode(text: &str) -> Result<Self, DataError> {
        let event: Self = serde_json::from_str(text)
            .map_err(|e| DataError::parse_error("frame", e.to_string()))?;

        if let Some(alert) = event.alert() {
            alert.validate()?;
        }

        Ok(event)
    }

    /// Encodes this event as a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ParseFailed` if serialization fails.
    pub fn encode(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|e| DataError::parse_error("event", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::alert;
    use argus_core::types::Priority;

    #[test]
    fn test_wire_shape() {
        let event = Event::AlertCreated(alert("ALT-1", Priority::High));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], "alert_created");
        assert_eq!(value["data"]["id"], "ALT-1");
        assert_eq!(value["data"]["priority"], "high");
        assert!(value["data"]["transaction"]["amount"].is_number());
    }

    #[test]
    fn test_connection_status_wire_shape() {
        let text = r#"{"type":"connection_status","data":{"connected":true,"timestamp":"2024-01-15T10:30:00.000Z"}}"#;
        let event = Event::decode(text).unwrap();

        match event {
            Event::ConnectionStatus(status) => {
                assert!(status.connected);
                assert_eq!(status.timestamp.to_rfc3339(), "2024-01-15T10:30:00+00:00");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_decode_roundtrip() {
        let event = Event::AlertUpdated(alert("ALT-2", Priority::Low));
        let decoded = Event::decode(&event.encode().unwrap()).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.kind(), "alert_updated");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Event::decode("not json"),
            Err(DataError::ParseFailed { .. })
        ));
        assert!(matches!(
            Event::decode(r#"{"type":"alert_deleted","data":{}}"#),
            Err(DataError::ParseFailed { .. })
        ));
        assert!(matches!(
            Event::decode(r#"{"type":"alert_created","data":{"id":"ALT-1"}}"#),
            Err(DataError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_alert() {
        let mut record = alert("ALT-3", Priority::Critical);
        record.ml_score = 1.7;
        let text = Event::AlertCreated(record).encode().unwrap();

        assert!(Event::decode(&text).is_err());
    }
}
