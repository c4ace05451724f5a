//! Reads configuration documents in YAML, TOML or JSON.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Document syntax of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the file extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Returns the name used in parse errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        let parsed = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| format!("{} parse error: {e}", self.name()))
    }
}

/// Loads configuration documents and carries the environment prefix used
/// for overrides.
///
/// ```rust,no_run
/// use argus_core::config::{ArgusConfig, ConfigLoader};
///
/// let config: ArgusConfig = ConfigLoader::new().load_file("argus.yaml")?;
/// # Ok::<(), argus_core::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader without an environment prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix for environment overrides (e.g. `ARGUS`).
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Returns the environment prefix, if set.
    #[must_use]
    pub fn env_prefix(&self) -> Option<&str> {
        self.env_prefix.as_deref()
    }

    /// Reads and parses `path`, picking the format from its extension.
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let display = path.display().to_string();

        let Some(format) = ConfigFormat::from_path(path) else {
            return Err(ConfigError::InvalidFormat {
                path: display,
                reason: "expected a .yaml, .yml, .toml or .json file".to_string(),
            });
        };

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: display.clone(),
            reason: e.to_string(),
        })?;

        format
            .parse(&content)
            .map_err(|reason| ConfigError::InvalidFormat {
                path: display,
                reason,
            })
    }

    /// Parses an in-memory document.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        format
            .parse(content)
            .map_err(|reason| ConfigError::InvalidFormat {
                path: "<string>".to_string(),
                reason,
            })
    }
}
