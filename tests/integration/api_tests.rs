//! API integration tests
//!
//! Drive the full router against an in-memory database with a fixed cover
//! lookup, so no server or network is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_server::{
    api, db, repository::Repository, services::covers::CoverLookup, services::Services, AppState,
};

struct FixedCovers;

#[async_trait]
impl CoverLookup for FixedCovers {
    async fn resolve_cover_url(&self, isbn: &str) -> String {
        format!("https://covers.test/{}-L.jpg", isbn)
    }
}

async fn app() -> (Router, Repository) {
    let pool = db::connect_in_memory().await.expect("Failed to open database");
    let repository = Repository::new(pool);
    let services = Services::with_covers(repository.clone(), Arc::new(FixedCovers));
    let state = AppState {
        services: Arc::new(services),
    };
    (api::create_router(state), repository)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cookie, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn add_author(app: &Router, form: &str) -> i64 {
    let (status, _, _) = send(app, post_form("/add_author", form)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, _, body) = send(app, get("/add_book")).await;
    body["authors"]
        .as_array()
        .and_then(|authors| authors.iter().map(|a| a["id"].as_i64().unwrap()).max())
        .expect("No author ID")
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app().await;
    let (status, _, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_add_author_redirects_with_flash() {
    let (app, _) = app().await;
    let (status, cookie, _) = send(
        &app,
        post_form("/add_author", "name=Jane+Austen&birthdate=1775-12-16&date_of_death="),
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let cookie = cookie.expect("No flash cookie");
    assert!(cookie.starts_with("flash="));

    let (status, _, body) = send(&app, get_with_cookie("/add_author", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["flashes"][0]["category"], "success");
    assert_eq!(body["flashes"][0]["message"], "Author successfully added!");
}

#[tokio::test]
async fn test_add_author_invalid_fields() {
    let (app, repository) = app().await;
    let (status, _, body) = send(
        &app,
        post_form("/add_author", "name=&birthdate=16%2F12%2F1775&date_of_death="),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());
    assert!(body["fields"]["birthdate"].is_array());
    assert!(body["fields"].get("date_of_death").is_none());
    assert_eq!(repository.authors.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_book_form_lists_authors() {
    let (app, _) = app().await;
    add_author(&app, "name=Jane+Austen&birthdate=1775-12-16").await;

    let (status, _, body) = send(&app, get("/add_book")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authors"][0]["name"], "Jane Austen");
    assert_eq!(body["authors"][0]["birth_date"], "1775-12-16");
    assert!(body["authors"][0]["date_of_death"].is_null());
}

#[tokio::test]
async fn test_add_book_unknown_author_is_database_error() {
    let (app, repository) = app().await;
    let (status, _, body) = send(
        &app,
        post_form(
            "/add_book",
            "isbn=9780141439518&title=Pride+and+Prejudice&publication_year=1813&author_id=99",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DbFailure");
    assert_eq!(repository.books.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_book_invalid_fields() {
    let (app, _) = app().await;
    let (status, _, body) = send(
        &app,
        post_form("/add_book", "isbn=123&title=Emma&publication_year=3000&author_id=x"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert!(body["fields"]["isbn"].is_array());
    assert!(body["fields"]["publication_year"].is_array());
    assert!(body["fields"]["author_id"].is_array());
    assert!(body["fields"].get("title").is_none());
}

#[tokio::test]
async fn test_home_sort_and_search() {
    let (app, _) = app().await;
    let woolf = add_author(&app, "name=Virginia+Woolf&birthdate=1882-01-25").await;
    let austen = add_author(&app, "name=Jane+Austen&birthdate=1775-12-16").await;

    for form in [
        format!("isbn=9780156628709&title=To+the+Lighthouse&publication_year=1927&author_id={}", woolf),
        format!("isbn=9780141439518&title=Pride+and+Prejudice&publication_year=1813&author_id={}", austen),
        format!("isbn=9780156030359&title=Mrs+Dalloway&publication_year=1925&author_id={}", woolf),
    ] {
        let (status, _, _) = send(&app, post_form("/add_book", &form)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
    }

    let (status, _, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sort_by"], "title");
    let titles: Vec<&str> = body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Mrs Dalloway", "Pride and Prejudice", "To the Lighthouse"]);
    assert_eq!(
        body["books"][1]["cover_url"],
        "https://covers.test/9780141439518-L.jpg"
    );

    let (_, _, body) = send(&app, get("/sort_books?sort_by=author")).await;
    assert_eq!(body["sort_by"], "author");
    assert_eq!(body["books"][0]["author_name"], "Jane Austen");

    let (_, _, body) = send(&app, get("/sort_books?sort_by=year")).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 3);

    let (_, _, body) = send(&app, get("/search_books?query=dalloway")).await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert!(body["message"].is_null());

    let (_, _, body) = send(&app, get("/search_books?query=")).await;
    assert!(body["books"].as_array().unwrap().is_empty());
    assert_eq!(body["message"], "Please enter a search term.");

    let (_, _, body) = send(&app, get("/search_books?query=Unlikely12345")).await;
    assert!(body["books"].as_array().unwrap().is_empty());
    assert_eq!(body["message"], "No books found matching 'Unlikely12345'.");
}

#[tokio::test]
async fn test_delete_last_book_removes_author() {
    let (app, repository) = app().await;
    let austen = add_author(&app, "name=Jane+Austen&birthdate=1775-12-16").await;
    let (status, _, _) = send(
        &app,
        post_form(
            "/add_book",
            &format!(
                "isbn=9780141439518&title=Pride+and+Prejudice&publication_year=1813&author_id={}",
                austen
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, _, body) = send(&app, get("/")).await;
    let book_id = body["books"][0]["id"].as_i64().expect("No book ID");

    let (status, _, body) = send(&app, get(&format!("/book/{}", book_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author_name"], "Jane Austen");

    let (status, cookie, _) = send(&app, post_form(&format!("/book/{}/delete", book_id), "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, _, body) = send(&app, get_with_cookie("/", &cookie.expect("No flash cookie"))).await;
    assert!(body["books"].as_array().unwrap().is_empty());
    assert_eq!(
        body["flashes"][0]["message"],
        "Book 'Pride and Prejudice' deleted successfully!"
    );
    assert_eq!(body["flashes"][1]["category"], "warning");

    assert_eq!(repository.books.count().await.unwrap(), 0);
    assert_eq!(repository.authors.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_unknown_book() {
    let (app, _) = app().await;
    let (status, _, body) = send(&app, post_form("/book/404/delete", "")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchItem");
}
