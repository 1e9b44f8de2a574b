//! # Configuration
//!
//! Layered settings: built-in defaults, then an optional
//! `config/default.toml`, then `FREIGHT__`-prefixed environment variables
//! (`FREIGHT__SERVER__PORT=9000`).

use crate::application::services::WeightedScoreStrategy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration failure at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// Values were read but are unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Parses host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the host is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address {}: {e}", self.host)))
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Emit JSON lines instead of human readable text.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Bid ranking weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Weight of the inverse-rate factor.
    pub rate_weight: f64,
    /// Weight of the normalised rating factor.
    pub rating_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        let strategy = WeightedScoreStrategy::default();
        Self {
            rate_weight: strategy.rate_weight,
            rating_weight: strategy.rating_weight,
        }
    }
}

impl RankingConfig {
    /// Builds the ranking strategy these weights describe.
    #[must_use]
    pub fn strategy(&self) -> WeightedScoreStrategy {
        WeightedScoreStrategy::new(self.rate_weight, self.rating_weight)
    }
}

/// Page size limits for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Size used when the request names none.
    pub default_page_size: u32,
    /// Largest size a request may ask for.
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// Bid ranking.
    pub ranking: RankingConfig,
    /// Pagination.
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Loads and validates configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value is out of
    /// range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/default")
    }

    /// Like [`AppConfig::load`] with an explicit file path (extension
    /// optional). A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source is malformed or a value is out of
    /// range.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Self::default())?)
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("FREIGHT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranking = &self.ranking;
        let weights = [ranking.rate_weight, ranking.rating_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "ranking weights must be non-negative numbers".to_string(),
            ));
        }
        if ranking.rate_weight + ranking.rating_weight <= 0.0 {
            return Err(ConfigError::Invalid(
                "ranking weights must sum to a positive number".to_string(),
            ));
        }

        let pagination = &self.pagination;
        if pagination.default_page_size == 0 || pagination.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be at least 1".to_string()));
        }
        if pagination.default_page_size > pagination.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default page size {} exceeds max page size {}",
                pagination.default_page_size, pagination.max_page_size
            )));
        }

        self.server.socket_addr()?;
        Ok(())
    }
}
