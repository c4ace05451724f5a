//! # Argus Core
//!
//! Core types and interfaces for the Argus real-time fraud-alert feed.
//!
//! This crate provides:
//! - The alert domain model carried by feed events ([`types::AlertRecord`] and friends)
//! - A `NewType` wrapper for monetary amounts that round-trips as a plain JSON number
//! - Error types and severity classification
//! - Configuration management with YAML/TOML/JSON support and environment variable overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]

/// Alert domain types
pub mod types;

/// Error types and handling
pub mod error;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::{ArgusError, ConfigError, DataError, ErrorSeverity, NetworkError};
    pub use crate::types::*;
}
