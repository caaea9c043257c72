//! Catalog endpoints: author/book forms, listings, search and delete

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorForm},
        book::{BookForm, BookOrder, BookView, SearchQuery, SortQuery},
    },
    AppState,
};

use super::flash::{self, FlashMessage};

/// Context for the author and book forms
#[derive(Serialize, ToSchema)]
pub struct FormPage {
    /// Authors available for the book form (empty on the author form)
    pub authors: Vec<Author>,
    pub flashes: Vec<FlashMessage>,
}

/// Book listing page
#[derive(Serialize, ToSchema)]
pub struct BookListing {
    pub books: Vec<BookView>,
    /// Ordering requested for this page
    pub sort_by: String,
    pub flashes: Vec<FlashMessage>,
}

/// Search result page
#[derive(Serialize, ToSchema)]
pub struct SearchPage {
    pub query: String,
    pub books: Vec<BookView>,
    /// Prompt or not-found notice when no books are shown
    pub message: Option<String>,
}

/// Author form
#[utoipa::path(
    get,
    path = "/add_author",
    tag = "catalog",
    responses(
        (status = 200, description = "Author form context", body = FormPage)
    )
)]
pub async fn add_author_form(jar: CookieJar) -> (CookieJar, Json<FormPage>) {
    let (jar, flashes) = flash::take(jar);
    (
        jar,
        Json(FormPage {
            authors: Vec::new(),
            flashes,
        }),
    )
}

/// Create an author
#[utoipa::path(
    post,
    path = "/add_author",
    tag = "catalog",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Author created, redirect to the form"),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 500, description = "Database error", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_author(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AuthorForm>,
) -> AppResult<(CookieJar, Redirect)> {
    state.services.catalog.create_author(&form).await?;

    let jar = flash::push(jar, vec![FlashMessage::success("Author successfully added!")]);
    Ok((jar, Redirect::to("/add_author")))
}

/// Book form, pre-populated with the author list
#[utoipa::path(
    get,
    path = "/add_book",
    tag = "catalog",
    responses(
        (status = 200, description = "Book form context", body = FormPage)
    )
)]
pub async fn add_book_form(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<FormPage>)> {
    let authors = state.services.catalog.list_authors().await?;
    let (jar, flashes) = flash::take(jar);
    Ok((jar, Json(FormPage { authors, flashes })))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/add_book",
    tag = "catalog",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Book created, redirect to the form"),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 500, description = "Unknown author or duplicate ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<BookForm>,
) -> AppResult<(CookieJar, Redirect)> {
    state.services.catalog.create_book(&form).await?;

    let jar = flash::push(jar, vec![FlashMessage::success("Book successfully added!")]);
    Ok((jar, Redirect::to("/add_book")))
}

/// Home page: all books sorted by title
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Books with cover URLs", body = BookListing)
    )
)]
pub async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<BookListing>)> {
    let books = state.services.catalog.list_books(&BookOrder::Title).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Json(BookListing {
            books,
            sort_by: "title".to_string(),
            flashes,
        }),
    ))
}

/// Books under a chosen ordering
#[utoipa::path(
    get,
    path = "/sort_books",
    tag = "catalog",
    params(SortQuery),
    responses(
        (status = 200, description = "Sorted books", body = BookListing)
    )
)]
pub async fn sort_books(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SortQuery>,
) -> AppResult<(CookieJar, Json<BookListing>)> {
    let order = BookOrder::from_param(query.sort_by.as_deref());
    let books = state.services.catalog.list_books(&order).await?;
    let (jar, flashes) = flash::take(jar);
    Ok((
        jar,
        Json(BookListing {
            books,
            sort_by: query.sort_by.unwrap_or_else(|| "title".to_string()),
            flashes,
        }),
    ))
}

/// Case-insensitive title search
#[utoipa::path(
    get,
    path = "/search_books",
    tag = "catalog",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books, or an empty list with a message", body = SearchPage)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchPage>> {
    let result = state.services.catalog.search_books(&query.query).await?;
    Ok(Json(SearchPage {
        query: query.query.trim().to_string(),
        books: result.books,
        message: result.message,
    }))
}

/// Book details
#[utoipa::path(
    get,
    path = "/book/{id}",
    tag = "catalog",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book with author name and cover URL", body = BookView),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<BookView>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Delete a book; its author goes too when it was the last book
#[utoipa::path(
    post,
    path = "/book/{id}/delete",
    tag = "catalog",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Book deleted, redirect to the home page"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<(CookieJar, Redirect)> {
    let deleted = state.services.catalog.delete_book(id).await?;

    let mut messages = vec![FlashMessage::success(format!(
        "Book '{}' deleted successfully!",
        deleted.book.title
    ))];
    if let Some(author) = deleted.removed_author {
        messages.push(FlashMessage::warning(format!(
            "Author '{}' was removed because no books remain.",
            author.name
        )));
    }

    let jar = flash::push(jar, messages);
    Ok((jar, Redirect::to("/")))
}
