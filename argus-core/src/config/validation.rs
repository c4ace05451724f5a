//! Validation helpers and environment overrides.

use crate::error::ConfigError;
use std::env::VarError;
use std::fmt::Display;
use std::str::FromStr;

/// Collects validation failures while walking nested config sections.
#[derive(Debug, Default)]
pub struct ValidationContext {
    path: Vec<String>,
    errors: Vec<ConfigError>,
}

impl ValidationContext {
    /// Creates an empty context at the document root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Descends into `section`; fields are reported relative to it.
    pub fn enter(&mut self, section: impl Into<String>) {
        self.path.push(section.into());
    }

    /// Returns to the parent section.
    pub fn exit(&mut self) {
        self.path.pop();
    }

    /// Returns `field` prefixed with the current section path.
    #[must_use]
    pub fn qualify(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.path.join("."))
        }
    }

    /// Records an invalid value for `field` in the current section.
    pub fn reject(&mut self, field: &str, reason: impl Into<String>) {
        let error = ConfigError::invalid_value(self.qualify(field), reason);
        self.errors.push(error);
    }

    fn require(&mut self, field: &str) {
        let error = ConfigError::missing_field(self.qualify(field));
        self.errors.push(error);
    }

    /// Returns the first recorded failure.
    pub fn into_result(self) -> Result<(), ConfigError> {
        self.errors.into_iter().next().map_or(Ok(()), Err)
    }
}

/// Chainable checks that record failures into a [`ValidationContext`].
#[derive(Debug)]
pub struct Validator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> Validator<'a> {
    /// Wraps `ctx`.
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    /// Fails when `value` is blank.
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.ctx.require(field);
        }
        self
    }

    /// Fails unless `min <= value <= max`. NaN always fails.
    pub fn in_range<T: PartialOrd + Display>(
        &mut self,
        field: &str,
        value: &T,
        min: &T,
        max: &T,
    ) -> &mut Self {
        if !(value >= min && value <= max) {
            self.ctx
                .reject(field, format!("{value} is outside [{min}, {max}]"));
        }
        self
    }

    /// Fails unless `value` is greater than zero.
    pub fn positive<T: PartialOrd + Default + Display>(&mut self, field: &str, value: &T) -> &mut Self {
        if *value <= T::default() {
            self.ctx
                .reject(field, format!("{value} must be greater than zero"));
        }
        self
    }

    /// Fails unless `value` is a `ws://` or `wss://` URL.
    pub fn valid_ws_url(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.starts_with("ws://") && !value.starts_with("wss://") {
            self.ctx.reject(field, "expected a ws:// or wss:// URL");
        }
        self
    }
}

/// Applies `ARGUS_*` style overrides from the process environment.
///
/// An unset variable leaves the target untouched. A variable that is set
/// but does not parse is an [`ConfigError::InvalidEnvVar`] naming it.
pub struct EnvOverride;

impl EnvOverride {
    /// Overrides a string setting.
    pub fn apply_string(name: &str, target: &mut String) -> Result<(), ConfigError> {
        if let Some(value) = Self::read(name)? {
            *target = value;
        }
        Ok(())
    }

    /// Overrides a setting parsed with [`FromStr`].
    pub fn apply_parsed<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some(value) = Self::read(name)? {
            *target = Self::parse(name, &value)?;
        }
        Ok(())
    }

    /// Overrides an optional setting parsed with [`FromStr`].
    pub fn apply_optional<T>(name: &str, target: &mut Option<T>) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if let Some(value) = Self::read(name)? {
            *target = Some(Self::parse(name, &value)?);
        }
        Ok(())
    }

    /// Overrides a flag. Accepts true/false, 1/0, yes/no and on/off.
    pub fn apply_bool(name: &str, target: &mut bool) -> Result<(), ConfigError> {
        let Some(value) = Self::read(name)? else {
            return Ok(());
        };
        *target = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => {
                return Err(ConfigError::invalid_env_var(
                    name,
                    value,
                    "expected a boolean",
                ));
            }
        };
        Ok(())
    }

    fn read(name: &str) -> Result<Option<String>, ConfigError> {
        match std::env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(raw)) => Err(ConfigError::invalid_env_var(
                name,
                raw.to_string_lossy(),
                "not valid UTF-8",
            )),
        }
    }

    fn parse<T>(name: &str, value: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid_env_var(name, value, e.to_string()))
    }
}
