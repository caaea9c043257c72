//! Catalog management service: authors, books, listings and cascade delete

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorForm, NewAuthor},
        book::{Book, BookForm, BookOrder, BookView, BookWithAuthor, DeletedBook, NewBook},
    },
    repository::Repository,
};

use super::covers::CoverLookup;

/// Prompt returned when a search is submitted without text
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term.";

/// Result of a title search
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResult {
    pub books: Vec<BookView>,
    /// Set when the result is empty (missing query or no match)
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    covers: Arc<dyn CoverLookup>,
}

impl CatalogService {
    pub fn new(repository: Repository, covers: Arc<dyn CoverLookup>) -> Self {
        Self { repository, covers }
    }

    /// List authors (book form choices)
    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    pub async fn get_author(&self, id: i64) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Validate and store a new author
    pub async fn create_author(&self, form: &AuthorForm) -> AppResult<Author> {
        let author = NewAuthor::from_form(form)?;
        let created = self.repository.authors.create(&author).await?;
        tracing::info!("Created author id={}: {}", created.id, created);
        Ok(created)
    }

    /// Validate and store a new book. The author must exist and the ISBN be unused;
    /// both are enforced by the database.
    pub async fn create_book(&self, form: &BookForm) -> AppResult<Book> {
        let book = NewBook::from_form(form)?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!("Created book id={}: {}", created.id, created);
        Ok(created)
    }

    /// Book with author name and cover
    pub async fn get_book(&self, id: i64) -> AppResult<BookView> {
        let book = self.repository.books.get_with_author(id).await?;
        Ok(self.decorate(vec![book]).await.remove(0))
    }

    /// All books under the requested order, each with its cover URL
    pub async fn list_books(&self, order: &BookOrder) -> AppResult<Vec<BookView>> {
        let books = self.repository.books.list(order).await?;
        Ok(self.decorate(books).await)
    }

    /// Case-insensitive title search
    pub async fn search_books(&self, query: &str) -> AppResult<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResult {
                books: Vec::new(),
                message: Some(EMPTY_QUERY_MESSAGE.to_string()),
            });
        }

        let books = self.repository.books.search_by_title(query).await?;
        if books.is_empty() {
            return Ok(SearchResult {
                books: Vec::new(),
                message: Some(format!("No books found matching '{}'.", query)),
            });
        }

        Ok(SearchResult {
            books: self.decorate(books).await,
            message: None,
        })
    }

    /// Delete a book, then its author when no books remain.
    ///
    /// The two deletes are separate statements; a failure in between leaves an
    /// author without books.
    pub async fn delete_book(&self, id: i64) -> AppResult<DeletedBook> {
        let book = self.repository.books.get_by_id(id).await?;
        let author_id = book.author_id;

        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}: {}", id, book);

        let remaining = self.repository.books.count_for_author(author_id).await?;
        let removed_author = if remaining == 0 {
            let author = self.repository.authors.get_by_id(author_id).await?;
            self.repository.authors.delete(author_id).await?;
            tracing::info!("Deleted author id={} (no books left): {}", author_id, author);
            Some(author)
        } else {
            None
        };

        Ok(DeletedBook {
            book,
            removed_author,
        })
    }

    /// Attach a cover URL to each book, one lookup per book
    async fn decorate(&self, books: Vec<BookWithAuthor>) -> Vec<BookView> {
        let mut views = Vec::with_capacity(books.len());
        for book in books {
            let cover_url = self.covers.resolve_cover_url(&book.isbn).await;
            views.push(BookView { book, cover_url });
        }
        views
    }
}
