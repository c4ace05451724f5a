//! Configuration traits for validation and environment overrides.

use crate::error::ConfigError;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use argus_core::config::Validatable;
/// use argus_core::error::ConfigError;
///
/// struct Endpoint {
///     url: String,
/// }
///
/// impl Validatable for Endpoint {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.url.is_empty() {
///             return Err(ConfigError::missing_field("url"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(Endpoint { url: String::new() }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration, returning the first problem found.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for types that support environment variable overrides.
pub trait Configurable: Sized {
    /// Applies environment variable overrides using the given prefix (e.g. `ARGUS`).
    ///
    /// Fails on the first variable that is set but does not parse.
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError>;

    /// Returns the environment variable names that can override this configuration.
    fn env_var_names(prefix: &str) -> Vec<String>;
}
