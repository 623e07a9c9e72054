//! Application configuration.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Volunteer matching configuration.
    #[serde(default)]
    pub volunteers: VolunteerConfig,
    /// Emotion classifier configuration.
    #[serde(default)]
    pub emotion: EmotionConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Volunteer matching configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct VolunteerConfig {
    /// Maximum number of volunteers returned by keyword matching.
    #[serde(default = "default_volunteer_limit")]
    pub match_limit: usize,
    /// Maximum number of volunteers returned by the availability-now filter.
    #[serde(default = "default_volunteer_limit")]
    pub available_limit: usize,
    /// Maximum number of volunteers returned by the plain listing.
    #[serde(default = "default_volunteer_limit")]
    pub list_limit: usize,
    /// Upper bound for `page_size` on paginated listings.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
    /// IANA time zone used to decide "today" and "now".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for VolunteerConfig {
    fn default() -> Self {
        Self {
            match_limit: default_volunteer_limit(),
            available_limit: default_volunteer_limit(),
            list_limit: default_volunteer_limit(),
            max_page_size: default_max_page_size(),
            timezone: default_timezone(),
        }
    }
}

impl VolunteerConfig {
    /// Parse the configured time zone.
    pub fn tz(&self) -> Result<Tz, config::ConfigError> {
        self.timezone.parse::<Tz>().map_err(|e| {
            config::ConfigError::Message(format!("invalid timezone {}: {e}", self.timezone))
        })
    }
}

/// Emotion classifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmotionConfig {
    /// Inference endpoint. When unset every analysis yields the fallback distribution.
    #[serde(default)]
    pub url: Option<String>,
    /// Bearer token sent to the inference endpoint.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_emotion_timeout")]
    pub timeout_secs: u64,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_emotion_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

const fn default_volunteer_limit() -> usize {
    5
}

const fn default_max_page_size() -> u64 {
    50
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_emotion_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SAHEMIND_ENV`)
    /// 3. Environment variables with `SAHEMIND_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SAHEMIND_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SAHEMIND")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SAHEMIND")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load from the file named by `SAHEMIND_CONFIG` if set, otherwise fall
    /// back to [`Config::load`].
    pub fn discover() -> Result<Self, config::ConfigError> {
        match std::env::var_os("SAHEMIND_CONFIG") {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }
}
