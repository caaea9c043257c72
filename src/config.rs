//! Configuration management for Bookshelf server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Cover image host settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CoversConfig {
    /// Base URL; the cover URL is `<base_url>/<isbn>-<size>.jpg`
    pub base_url: String,
    /// Open Library size suffix (S, M or L)
    pub size: String,
    /// Asset served when no cover can be resolved
    pub fallback_url: String,
    /// Request timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub covers: CoversConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default"))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (BOOKSHELF_<SECTION>__<KEY>)
            .add_source(environment())
            // Override database URL from DATABASE_URL env var if present
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

/// `BOOKSHELF_COVERS__TIMEOUT_SECS` sets `covers.timeout_secs`; a single `_`
/// stays inside the key name.
fn environment() -> Environment {
    Environment::with_prefix("BOOKSHELF")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/library.sqlite".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for CoversConfig {
    fn default() -> Self {
        Self {
            base_url: "https://covers.openlibrary.org/b/isbn".to_string(),
            size: "L".to_string(),
            fallback_url: "/static/no_cover.png".to_string(),
            timeout_secs: None,
        }
    }
}
