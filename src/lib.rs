//! Bookshelf catalog server
//!
//! Manages authors and their books over a small JSON API: creation with
//! validation, sorted listings, title search, cascade delete and cover
//! images resolved from Open Library.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}
