//! API handlers and router for Bookshelf endpoints

pub mod catalog;
pub mod flash;
pub mod health;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/", get(catalog::home))
        .route("/add_author", get(catalog::add_author_form).post(catalog::add_author))
        .route("/add_book", get(catalog::add_book_form).post(catalog::add_book))
        .route("/sort_books", get(catalog::sort_books))
        .route("/search_books", get(catalog::search_books))
        .route("/book/:id", get(catalog::get_book))
        .route("/book/:id/delete", post(catalog::delete_book))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
