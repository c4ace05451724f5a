//! Configuration management module.
//!
//! This module provides:
//! - YAML, TOML and JSON configuration file formats
//! - Configuration validation with descriptive error messages
//! - Environment variable overrides (`ARGUS_*`)
//!
//! # Example
//!
//! ```rust,no_run
//! use argus_core::config::{ArgusConfig, ConfigFormat, ConfigLoader};
//!
//! // File, then ARGUS_* overrides, then validation
//! let config = ArgusConfig::load(Some("argus.yaml".as_ref()))?;
//!
//! // Or parse a string directly
//! let config: ArgusConfig = ConfigLoader::new()
//!     .load_str("feed:\n  mode: live\n", ConfigFormat::Yaml)?;
//! # Ok::<(), argus_core::error::ConfigError>(())
//! ```

mod argus_config;
mod loader;
mod traits;
pub mod validation;

pub use argus_config::{
    ArgusConfig, ENV_PREFIX, FeedConfig, FeedMode, LoggingConfig, SimulationConfig,
};
pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
pub use validation::{EnvOverride, ValidationContext, Validator};
