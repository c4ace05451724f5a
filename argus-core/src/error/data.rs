//! Data-related error types.
//!
//! Raised when an inbound feed frame cannot be decoded or carries a payload
//! that fails validation. These errors reject a single message and never
//! affect connection state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data error type covering decode failures and payload validation errors.
///
/// # Examples
///
/// ```
/// use argus_core::error::DataError;
///
/// let error = DataError::ParseFailed {
///     field: "frame".to_string(),
///     reason: "expected value at line 1 column 1".to_string(),
/// };
/// assert!(error.to_string().contains("frame"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataError {
    /// Failed to parse data.
    #[error("[Data] Parse failed for field '{field}': {reason}")]
    ParseFailed {
        /// Field that failed to parse.
        field: String,
        /// Reason for the parse failure.
        reason: String,
    },

    /// Data validation failed.
    #[error("[Data] Validation failed: {field} - {reason}")]
    ValidationFailed {
        /// Field that failed validation.
        field: String,
        /// Reason for the validation failure.
        reason: String,
    },

    /// Data is out of expected range.
    #[error("[Data] Out of range: {field} value {value} not in [{min}, {max}]")]
    OutOfRange {
        /// Field that is out of range.
        field: String,
        /// Actual value.
        value: String,
        /// Minimum allowed value.
        min: String,
        /// Maximum allowed value.
        max: String,
    },

    /// Frame kind cannot carry an event (e.g. non-UTF-8 binary payload).
    #[error("[Data] Unsupported frame: {kind}")]
    UnsupportedFrame {
        /// Kind of frame received.
        kind: String,
    },
}

impl DataError {
    /// Returns true if this error is recoverable.
    ///
    /// A rejected payload never poisons the stream, so data errors are not
    /// fatal, but retrying the same payload will not help either.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        use super::ErrorSeverity;
        match self {
            Self::ParseFailed { .. } | Self::ValidationFailed { .. } | Self::OutOfRange { .. } => {
                ErrorSeverity::Warning
            }
            Self::UnsupportedFrame { .. } => ErrorSeverity::Info,
        }
    }

    /// Creates a parse error for a specific field.
    #[must_use]
    pub fn parse_error(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation_error(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let error = DataError::out_of_range("ml_score", 1.7, 0.0, 1.0);
        let msg = error.to_string();
        assert!(msg.contains("ml_score"));
        assert!(msg.contains("1.7"));
        assert!(msg.contains("[0, 1]"));
    }

    #[test]
    fn test_helper_methods() {
        let error = DataError::parse_error("frame", "trailing characters");
        assert!(matches!(error, DataError::ParseFailed { .. }));

        let error = DataError::validation_error("id", "must not be empty");
        assert!(matches!(error, DataError::ValidationFailed { .. }));
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_unsupported_frame_severity() {
        let error = DataError::UnsupportedFrame {
            kind: "binary".to_string(),
        };
        assert_eq!(error.severity(), crate::error::ErrorSeverity::Info);
    }
}
