//! Cover image lookup against the Open Library covers host

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config::CoversConfig,
    error::{AppError, AppResult},
};

/// Resolves the URL shown as a book's cover
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CoverLookup: Send + Sync {
    /// Cover URL for an ISBN, or the fallback asset when the host has none.
    /// Never fails.
    async fn resolve_cover_url(&self, isbn: &str) -> String;
}

#[derive(Clone)]
pub struct CoverService {
    client: Client,
    config: CoversConfig,
}

impl CoverService {
    pub fn new(config: CoversConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Predictable cover URL for an ISBN
    pub fn cover_url(&self, isbn: &str) -> String {
        format!(
            "{}/{}-{}.jpg",
            self.config.base_url.trim_end_matches('/'),
            isbn,
            self.config.size
        )
    }
}

#[async_trait]
impl CoverLookup for CoverService {
    async fn resolve_cover_url(&self, isbn: &str) -> String {
        let url = self.cover_url(isbn);

        match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => url,
            Ok(response) => {
                tracing::debug!("No cover for ISBN {} (HTTP {})", isbn, response.status());
                self.config.fallback_url.clone()
            }
            Err(e) => {
                tracing::warn!("Cover lookup for ISBN {} failed: {}", isbn, e);
                self.config.fallback_url.clone()
            }
        }
    }
}
