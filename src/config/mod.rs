//! Configuration loading and validation.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::models::TierOrder;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. "sqlite://ranking.db"
    #[serde(default = "default_database_url")]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://ranking.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Ranking presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Profiles returned by the top ranking endpoint
    #[serde(default = "default_top_limit")]
    pub top_limit: u32,

    /// Tiers from highest to lowest. Empty keeps plain alphabetical order.
    #[serde(default)]
    pub tier_order: Vec<String>,

    /// Default page size for match history
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

fn default_top_limit() -> u32 {
    10
}

fn default_history_limit() -> u32 {
    20
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_limit: default_top_limit(),
            tier_order: Vec::new(),
            history_limit: default_history_limit(),
        }
    }
}

impl RankingConfig {
    pub fn tier_order(&self) -> TierOrder {
        TierOrder::from_list(&self.tier_order)
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }

        if self.ranking.top_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Ranking top_limit must be greater than 0".to_string(),
            ));
        }

        let origin = self.server.cors_origin.as_str();
        if origin != "*"
            && (!(origin.starts_with("http://") || origin.starts_with("https://"))
                || HeaderValue::from_str(origin).is_err())
        {
            return Err(ConfigError::ValidationError(format!(
                "Server cors_origin {:?} must be \"*\" or an http(s) origin",
                origin
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.ranking.tier_order.iter().find(|t| !seen.insert(t.as_str())) {
            return Err(ConfigError::ValidationError(format!(
                "Tier {:?} listed twice in tier_order",
                dup
            )));
        }

        Ok(())
    }
}
