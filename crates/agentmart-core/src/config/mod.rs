//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod cache;
pub mod database;
pub mod logging;
pub mod review;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::cache::CacheConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::review::ReviewConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides, e.g. `AGENTMART__SERVER__PORT=9000`.
const ENV_PREFIX: &str = "AGENTMART";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Slug lookup cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Review workflow settings.
    #[serde(default)]
    pub review: ReviewConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the base file at `path`, an environment-specific overlay
    /// `config/{env}.toml`, and environment variables prefixed with
    /// `AGENTMART__`. Missing files are skipped.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let base = path.trim_end_matches(".toml");

        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(document: &str) -> Result<Self, AppError> {
        config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").expect("defaults");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.review.min_rejection_reason_len, 10);
        assert!(!config.review.allow_self_review);
        assert_eq!(config.cache.slug_max_capacity, 10_000);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [review]
            min_rejection_reason_len = 3
            allow_self_review = true
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.review.min_rejection_reason_len, 3);
        assert!(config.review.allow_self_review);
    }
}
