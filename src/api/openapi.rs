//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{catalog, flash, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book and author catalog"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::home,
        catalog::add_author_form,
        catalog::add_author,
        catalog::add_book_form,
        catalog::add_book,
        catalog::sort_books,
        catalog::search_books,
        catalog::get_book,
        catalog::delete_book,
    ),
    components(
        schemas(
            // Catalog
            crate::models::author::Author,
            crate::models::author::AuthorForm,
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::book::BookWithAuthor,
            crate::models::book::BookView,
            crate::models::book::SortQuery,
            crate::models::book::SearchQuery,
            catalog::FormPage,
            catalog::BookListing,
            catalog::SearchPage,
            flash::FlashMessage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Authors, books, listings and search")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
