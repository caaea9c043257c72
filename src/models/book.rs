//! Book model and related types

use std::fmt;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::author::{field_error, validate_trimmed_text, Author};
use super::isbn::Isbn;
use crate::error::{AppError, AppResult};

/// Earliest accepted publication year
pub const MIN_PUBLICATION_YEAR: i32 = 1000;

/// Longest accepted title, after trimming
pub const MAX_TITLE_LENGTH: usize = 200;

/// Book row from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    /// Normalized 13-digit ISBN
    pub isbn: String,
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book: '{}' (ISBN: {}), published in {}",
            self.title, self.isbn, self.publication_year
        )
    }
}

/// Book joined with its author's name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookWithAuthor {
    pub id: i64,
    pub isbn: String,
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
    pub author_name: String,
}

/// Book as presented in listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookView {
    #[serde(flatten)]
    pub book: BookWithAuthor,
    /// Cover image URL, or the fallback asset
    pub cover_url: String,
}

/// Raw book form as submitted by the client
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(custom(function = "validate_isbn"))]
    #[serde(default)]
    pub isbn: String,
    #[validate(custom(function = "validate_title"))]
    #[serde(default)]
    pub title: String,
    #[validate(custom(function = "validate_publication_year"))]
    #[serde(default)]
    pub publication_year: String,
    #[validate(custom(function = "validate_author_id"))]
    #[serde(default)]
    pub author_id: String,
}

/// Validated book ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub isbn: Isbn,
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
}

impl NewBook {
    /// Validate a raw form, reporting every malformed field at once
    pub fn from_form(form: &BookForm) -> AppResult<Self> {
        form.validate()?;

        let isbn = Isbn::parse(&form.isbn).map_err(|e| AppError::Validation(e.to_string()))?;
        let publication_year = parse_publication_year(&form.publication_year)
            .map_err(|_| AppError::Validation("publication_year is invalid".to_string()))?;
        let author_id = parse_author_id(&form.author_id)
            .map_err(|_| AppError::Validation("author_id is invalid".to_string()))?;

        Ok(Self {
            isbn,
            title: form.title.trim().to_string(),
            publication_year,
            author_id,
        })
    }
}

/// Latest accepted publication year
pub fn max_publication_year() -> i32 {
    Utc::now().year()
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    validate_trimmed_text(value, MAX_TITLE_LENGTH)
}

fn validate_isbn(value: &str) -> Result<(), ValidationError> {
    Isbn::parse(value).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("isbn");
        error.message = Some(e.to_string().into());
        error
    })
}

fn parse_publication_year(value: &str) -> Result<i32, ValidationError> {
    let year: i32 = value
        .trim()
        .parse()
        .map_err(|_| field_error("integer", "Publication year must be an integer"))?;
    let max = max_publication_year();
    if !(MIN_PUBLICATION_YEAR..=max).contains(&year) {
        let mut error = ValidationError::new("range");
        error.message = Some(
            format!("Publication year must be between {} and {}", MIN_PUBLICATION_YEAR, max).into(),
        );
        return Err(error);
    }
    Ok(year)
}

fn validate_publication_year(value: &str) -> Result<(), ValidationError> {
    parse_publication_year(value).map(|_| ())
}

fn parse_author_id(value: &str) -> Result<i64, ValidationError> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(field_error("author_id", "Author id must be a positive integer")),
    }
}

fn validate_author_id(value: &str) -> Result<(), ValidationError> {
    parse_author_id(value).map(|_| ())
}

/// Ordering applied to book listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOrder {
    Title,
    AuthorName,
    /// Storage order
    Unordered,
}

impl BookOrder {
    /// Map a `sort_by` query value. Absent means title; unknown keys are unordered.
    pub fn from_param(sort_by: Option<&str>) -> Self {
        match sort_by {
            None | Some("title") => BookOrder::Title,
            Some("author") => BookOrder::AuthorName,
            Some(_) => BookOrder::Unordered,
        }
    }
}

/// `GET /sort_books` query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// `title` (default) or `author`
    pub sort_by: Option<String>,
}

/// `GET /search_books` query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Outcome of a cascade delete
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedBook {
    pub book: Book,
    /// Set when the book was its author's last one and the author was removed
    pub removed_author: Option<Author>,
}
