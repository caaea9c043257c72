//! Database bootstrap: pool creation and embedded migrations

use std::{path::Path, str::FromStr};

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

/// Schema migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the SQLite pool described by the configuration, creating the
/// database file and its directory when missing.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if let Some(dir) = database_dir(&config.url) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::Internal(format!("Failed to create {}: {}", dir.display(), e))
        })?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Apply pending migrations
pub async fn migrate(pool: &Pool<Sqlite>) -> AppResult<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Database migrations failed: {}", e)))
}

/// Single-connection in-memory database with the schema applied
pub async fn connect_in_memory() -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Directory holding the database file, if the URL names one
fn database_dir(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let file = rest.split('?').next().unwrap_or_default();
    if file.is_empty() || file == ":memory:" {
        return None;
    }
    Path::new(file).parent().filter(|dir| !dir.as_os_str().is_empty())
}
