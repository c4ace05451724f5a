//! Argus feed configuration structures.
//!
//! Configuration is read once at start-up: a file (YAML, TOML or JSON) is
//! loaded, `ARGUS_*` environment variables are applied on top, and the
//! result is validated.

use super::loader::ConfigLoader;
use super::traits::{Configurable, Validatable};
use super::validation::{EnvOverride, ValidationContext, Validator};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "ARGUS";

/// Top-level Argus configuration.
///
/// # Example YAML
///
/// ```yaml
/// feed:
///   mode: live
///   url: "wss://alerts.internal/ws/alerts"
///   reconnect_interval_ms: 5000
///
/// logging:
///   level: debug
///   format: pretty
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgusConfig {
    /// Alert feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArgusConfig {
    /// Loads configuration from an optional file, applies `ARGUS_*`
    /// environment overrides and validates the result.
    ///
    /// Without a path the defaults are used as the base. An override that is
    /// set but does not parse fails the load.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Same as [`load`](Self::load) with overrides read from `{prefix}_*`.
    pub fn load_with_env_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, ConfigError> {
        let loader = ConfigLoader::new().with_env_prefix(prefix);
        let mut config = match path {
            Some(path) => loader.load_file(path)?,
            None => Self::default(),
        };

        if let Some(prefix) = loader.env_prefix() {
            config.apply_env_overrides(prefix)?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validatable for ArgusConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();

        ctx.enter("feed");
        self.feed.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.enter("logging");
        self.logging.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.into_result()
    }
}

impl Configurable for ArgusConfig {
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        self.feed.apply_env_overrides(&format!("{prefix}_FEED"))?;
        self.logging.apply_env_overrides(&format!("{prefix}_LOGGING"))
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        let feed = [
            "MODE",
            "URL",
            "RECONNECT_INTERVAL_MS",
            "CONNECT_TIMEOUT_MS",
            "HEARTBEAT_INTERVAL_MS",
            "SIMULATION_INTERVAL_MS",
            "SIMULATION_EMIT_PROBABILITY",
            "SIMULATION_SEED",
        ];
        let logging = ["LEVEL", "FORMAT", "DIRECTORY", "STDOUT_ENABLED"];

        feed.iter()
            .map(|name| format!("{prefix}_FEED_{name}"))
            .chain(logging.iter().map(|name| format!("{prefix}_LOGGING_{name}")))
            .collect()
    }
}

/// Where alert events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    /// Live WebSocket connection to the monitoring backend.
    Live,
    /// Locally generated alerts on a timer.
    #[default]
    Simulated,
}

impl FeedMode {
    /// Returns the mode name as written in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Simulated => "simulated",
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "simulated" | "mock" => Ok(Self::Simulated),
            other => Err(ConfigError::invalid_value(
                "mode",
                format!("unknown feed mode '{other}', expected live or simulated"),
            )),
        }
    }
}

/// Alert feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Live or simulated source.
    #[serde(default)]
    pub mode: FeedMode,

    /// WebSocket endpoint used in live mode.
    #[serde(default = "default_url")]
    pub url: String,

    /// Fixed delay before reconnecting after an involuntary disconnect.
    #[serde(default = "default_reconnect_interval_ms")]
    pub reconnect_interval_ms: u64,

    /// Timeout for opening the WebSocket connection.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Interval between heartbeat pings on a live connection.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,

    /// Simulated source settings.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_url() -> String {
    "ws://localhost:8000/ws/alerts".to_string()
}

fn default_reconnect_interval_ms() -> u64 {
    5000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_heartbeat_interval_ms() -> u64 {
    30_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            mode: FeedMode::default(),
            url: default_url(),
            reconnect_interval_ms: default_reconnect_interval_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl FeedConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        let mut validator = Validator::new(ctx);

        validator
            .positive("reconnect_interval_ms", &self.reconnect_interval_ms)
            .positive("connect_timeout_ms", &self.connect_timeout_ms)
            .positive("heartbeat_interval_ms", &self.heartbeat_interval_ms);

        // The URL only matters when we actually dial it.
        if self.mode == FeedMode::Live {
            validator
                .require_non_empty("url", &self.url)
                .valid_ws_url("url", &self.url);
        }

        ctx.enter("simulation");
        self.simulation.validate_with_context(ctx);
        ctx.exit();
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_parsed(&format!("{prefix}_MODE"), &mut self.mode)?;
        EnvOverride::apply_string(&format!("{prefix}_URL"), &mut self.url)?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_RECONNECT_INTERVAL_MS"),
            &mut self.reconnect_interval_ms,
        )?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_CONNECT_TIMEOUT_MS"),
            &mut self.connect_timeout_ms,
        )?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_HEARTBEAT_INTERVAL_MS"),
            &mut self.heartbeat_interval_ms,
        )?;
        self.simulation
            .apply_env_overrides(&format!("{prefix}_SIMULATION"))
    }

    /// Returns the reconnect interval as a Duration.
    #[must_use]
    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    /// Returns the connect timeout as a Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the heartbeat interval as a Duration.
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }
}

/// Settings for the simulated alert source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tick interval of the generator.
    #[serde(default = "default_simulation_interval_ms")]
    pub interval_ms: u64,

    /// Probability that a tick produces an alert.
    #[serde(default = "default_emit_probability")]
    pub emit_probability: f64,

    /// Fixed RNG seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_simulation_interval_ms() -> u64 {
    30_000
}

fn default_emit_probability() -> f64 {
    0.5
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_simulation_interval_ms(),
            emit_probability: default_emit_probability(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .positive("interval_ms", &self.interval_ms)
            .in_range("emit_probability", &self.emit_probability, &0.0, &1.0);
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_parsed(&format!("{prefix}_INTERVAL_MS"), &mut self.interval_ms)?;
        EnvOverride::apply_parsed(
            &format!("{prefix}_EMIT_PROBABILITY"),
            &mut self.emit_probability,
        )?;
        EnvOverride::apply_optional(&format!("{prefix}_SEED"), &mut self.seed)
    }

    /// Returns the tick interval as a Duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty).
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files. No file output when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Whether to also log to stdout.
    #[serde(default = "default_stdout_enabled")]
    pub stdout_enabled: bool,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_stdout_enabled() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            directory: None,
            stdout_enabled: default_stdout_enabled(),
        }
    }
}

impl LoggingConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        if !LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            ctx.reject("level", format!("expected one of {}", LOG_LEVELS.join(", ")));
        }
        if !LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            ctx.reject("format", "expected json or pretty");
        }
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        EnvOverride::apply_string(&format!("{prefix}_LEVEL"), &mut self.level)?;
        EnvOverride::apply_string(&format!("{prefix}_FORMAT"), &mut self.format)?;
        EnvOverride::apply_optional(&format!("{prefix}_DIRECTORY"), &mut self.directory)?;
        EnvOverride::apply_bool(
            &format!("{prefix}_STDOUT_ENABLED"),
            &mut self.stdout_enabled,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_default_config() {
        let config = ArgusConfig::default();
        assert_eq!(config.feed.mode, FeedMode::Simulated);
        assert_eq!(config.feed.url, "ws://localhost:8000/ws/alerts");
        assert_eq!(config.feed.reconnect_interval(), Duration::from_secs(5));
        assert_eq!(config.feed.simulation.interval(), Duration::from_secs(30));
        assert!((config.feed.simulation.emit_probability - 0.5).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "feed:\n  mode: live\n  url: wss://alerts.internal/ws\n";
        let config: ArgusConfig = ConfigLoader::new()
            .load_str(yaml, ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.feed.mode, FeedMode::Live);
        assert_eq!(config.feed.url, "wss://alerts.internal/ws");
        assert_eq!(config.feed.reconnect_interval_ms, 5000);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_formats_agree() {
        let yaml = "feed:\n  simulation:\n    seed: 42\nlogging:\n  directory: ./logs\n";
        let toml = "[feed.simulation]\nseed = 42\n\n[logging]\ndirectory = \"./logs\"\n";
        let json = r#"{"feed": {"simulation": {"seed": 42}}, "logging": {"directory": "./logs"}}"#;

        let mut expected = ArgusConfig::default();
        expected.feed.simulation.seed = Some(42);
        expected.logging.directory = Some("./logs".to_string());

        let loader = ConfigLoader::new();
        for (text, format) in [
            (yaml, ConfigFormat::Yaml),
            (toml, ConfigFormat::Toml),
            (json, ConfigFormat::Json),
        ] {
            let parsed: ArgusConfig = loader.load_str(text, format).unwrap();
            assert_eq!(parsed, expected, "{}", format.name());
        }
    }

    #[test]
    fn test_live_mode_requires_ws_url() {
        let mut config = ArgusConfig::default();
        config.feed.mode = FeedMode::Live;
        config.feed.url = "http://localhost:8000/ws/alerts".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.url"));

        // Simulated mode never dials the URL.
        config.feed.mode = FeedMode::Simulated;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_reconnect_interval_rejected() {
        let mut config = ArgusConfig::default();
        config.feed.reconnect_interval_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.reconnect_interval_ms"));
    }

    #[test]
    fn test_emit_probability_bounds() {
        let mut config = ArgusConfig::default();
        config.feed.simulation.emit_probability = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.simulation.emit_probability"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = ArgusConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_feed_mode_from_str() {
        assert_eq!("live".parse::<FeedMode>().unwrap(), FeedMode::Live);
        assert_eq!("Simulated".parse::<FeedMode>().unwrap(), FeedMode::Simulated);
        assert_eq!("mock".parse::<FeedMode>().unwrap(), FeedMode::Simulated);
        assert!("replay".parse::<FeedMode>().is_err());
    }

    #[test]
    fn test_env_overrides() {
        // Unique prefix so parallel tests never observe these variables.
        let prefix = "ARGUS_TEST_ENV_OVERRIDES";
        // SAFETY: the variables are namespaced to this test.
        unsafe {
            std::env::set_var(format!("{prefix}_FEED_MODE"), "live");
            std::env::set_var(format!("{prefix}_FEED_URL"), "wss://override/ws");
            std::env::set_var(format!("{prefix}_FEED_RECONNECT_INTERVAL_MS"), "1500");
            std::env::set_var(format!("{prefix}_FEED_SIMULATION_SEED"), "7");
            std::env::set_var(format!("{prefix}_LOGGING_LEVEL"), "debug");
        }

        let mut config = ArgusConfig::default();
        config.apply_env_overrides(prefix).unwrap();

        assert_eq!(config.feed.mode, FeedMode::Live);
        assert_eq!(config.feed.url, "wss://override/ws");
        assert_eq!(config.feed.reconnect_interval_ms, 1500);
        assert_eq!(config.feed.simulation.seed, Some(7));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.feed.connect_timeout_ms, 10_000);
    }

    #[test]
    fn test_malformed_env_override_fails_load() {
        let prefix = "ARGUS_TEST_MALFORMED_OVERRIDE";
        let name = format!("{prefix}_FEED_RECONNECT_INTERVAL_MS");
        // SAFETY: the variable is namespaced to this test.
        unsafe {
            std::env::set_var(&name, "5s");
        }

        let err = ArgusConfig::load_with_env_prefix(None, prefix).unwrap_err();
        match err {
            ConfigError::InvalidEnvVar {
                name: reported,
                value,
                ..
            } => {
                assert_eq!(reported, name);
                assert_eq!(value, "5s");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_feed_mode_override_fails_load() {
        let prefix = "ARGUS_TEST_UNKNOWN_MODE";
        // SAFETY: the variable is namespaced to this test.
        unsafe {
            std::env::set_var(format!("{prefix}_FEED_MODE"), "replay");
        }

        let err = ArgusConfig::load_with_env_prefix(None, prefix).unwrap_err();
        assert!(err.to_string().contains("ARGUS_TEST_UNKNOWN_MODE_FEED_MODE='replay'"));
    }

    #[test]
    fn test_env_var_names() {
        let names = ArgusConfig::env_var_names(ENV_PREFIX);
        assert!(names.contains(&"ARGUS_FEED_URL".to_string()));
        assert!(names.contains(&"ARGUS_FEED_RECONNECT_INTERVAL_MS".to_string()));
        assert!(names.contains(&"ARGUS_LOGGING_LEVEL".to_string()));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("argus_config_{}.yaml", std::process::id()));
        std::fs::write(&path, "feed:\n  simulation:\n    interval_ms: 1000\n").unwrap();

        let config = ArgusConfig::load(Some(&path)).unwrap();
        assert_eq!(config.feed.simulation.interval_ms, 1000);

        std::fs::remove_file(&path).ok();
    }
}
