//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `sunshare.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use sunshare_app::services::reading_aggregator::DEFAULT_MAX_CONCURRENT_FETCHES;
use sunshare_app::services::settlement_service::{DEFAULT_SETTLEMENT_TIMEOUT, SettlementOptions};
use sunshare_domain::settlement::DeficitPolicy;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Settlement engine tunables.
    pub settlement: SettlementConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Settlement engine configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Units whose readings are fetched at the same time.
    pub max_concurrent_fetches: usize,
    /// Deadline for one whole settlement run, in seconds.
    pub timeout_secs: u64,
    /// Rate used when no tariff covers a period. Unset means such
    /// settlements fail instead.
    pub fallback_rate: Option<f64>,
    /// Whether deficit shares are billed or only reported.
    pub deficit_policy: DeficitPolicy,
}

impl Config {
    /// Load configuration from `sunshare.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override cannot be parsed, or if the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("sunshare.toml")?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("SUNSHARE_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("SUNSHARE_PORT") {
            self.server.port = parse_var("SUNSHARE_PORT", &val)?;
        }
        if let Some(val) = var("SUNSHARE_BIND") {
            let (host, port) = val.rsplit_once(':').ok_or_else(|| {
                ConfigError::Validation(format!("SUNSHARE_BIND must be host:port, got {val:?}"))
            })?;
            self.server.host = host.to_string();
            self.server.port = parse_var("SUNSHARE_BIND", port)?;
        }
        if let Some(val) = var("SUNSHARE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("SUNSHARE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("SUNSHARE_MAX_CONCURRENT_FETCHES") {
            self.settlement.max_concurrent_fetches =
                parse_var("SUNSHARE_MAX_CONCURRENT_FETCHES", &val)?;
        }
        if let Some(val) = var("SUNSHARE_SETTLEMENT_TIMEOUT_SECS") {
            self.settlement.timeout_secs = parse_var("SUNSHARE_SETTLEMENT_TIMEOUT_SECS", &val)?;
        }
        if let Some(val) = var("SUNSHARE_FALLBACK_RATE") {
            self.settlement.fallback_rate = Some(parse_var("SUNSHARE_FALLBACK_RATE", &val)?);
        }
        if let Some(val) = var("SUNSHARE_DEFICIT_POLICY") {
            self.settlement.deficit_policy = parse_var("SUNSHARE_DEFICIT_POLICY", &val)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.settlement.max_concurrent_fetches == 0 {
            return Err(ConfigError::Validation(
                "max_concurrent_fetches must be non-zero".to_string(),
            ));
        }
        if self.settlement.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "settlement timeout must be non-zero".to_string(),
            ));
        }
        if let Some(rate) = self.settlement.fallback_rate {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "fallback_rate must be a non-negative number, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Options handed to the settlement service.
    #[must_use]
    pub fn settlement_options(&self) -> SettlementOptions {
        SettlementOptions {
            timeout: Duration::from_secs(self.settlement.timeout_secs),
            deficit_policy: self.settlement.deficit_policy,
        }
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| ConfigError::Validation(format!("{name}={value:?}: {err}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:sunshare.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "sunshared=info,sunshare=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            timeout_secs: DEFAULT_SETTLEMENT_TIMEOUT.as_secs(),
            fallback_rate: None,
            deficit_policy: DeficitPolicy::default(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
