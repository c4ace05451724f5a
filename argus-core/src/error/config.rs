//! Errors raised while loading and validating configuration.

use super::ErrorSeverity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the configuration could not be loaded.
///
/// Field names are dotted paths from the document root, e.g. `feed.url`.
///
/// ```
/// use argus_core::error::ConfigError;
///
/// let error = ConfigError::invalid_env_var("ARGUS_FEED_RECONNECT_INTERVAL_MS", "5s", "invalid digit");
/// assert!(error.to_string().contains("ARGUS_FEED_RECONNECT_INTERVAL_MS"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A required setting is empty.
    #[error("[Config] '{field}' is required")]
    MissingField {
        /// Dotted path of the setting.
        field: String,
    },

    /// A setting is present but unusable.
    #[error("[Config] Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the setting.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("[Config] Failed to read '{path}': {reason}")]
    FileReadError {
        /// File path as given.
        path: String,
        /// I/O error text.
        reason: String,
    },

    /// The file extension is unknown or the document does not parse.
    #[error("[Config] Invalid format in '{path}': {reason}")]
    InvalidFormat {
        /// File path, or `<string>` for in-memory documents.
        path: String,
        /// Parser error text.
        reason: String,
    },

    /// An environment override is set but does not parse.
    #[error("[Config] Invalid environment override {name}='{value}': {reason}")]
    InvalidEnvVar {
        /// Variable name, e.g. `ARGUS_FEED_URL`.
        name: String,
        /// Raw value found in the environment.
        value: String,
        /// Parser error text.
        reason: String,
    },
}

impl ConfigError {
    /// Configuration problems always stop start-up.
    #[must_use]
    pub const fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid environment override error.
    #[must_use]
    pub fn invalid_env_var(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
