//! Books repository

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookOrder, BookWithAuthor, NewBook},
};

const SELECT_WITH_AUTHOR: &str = r#"
    SELECT b.id, b.isbn, b.title, b.publication_year, b.author_id, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all books with their author's name
    pub async fn list(&self, order: &BookOrder) -> AppResult<Vec<BookWithAuthor>> {
        let order_clause = match order {
            BookOrder::Title => " ORDER BY b.title",
            BookOrder::AuthorName => " ORDER BY a.name",
            BookOrder::Unordered => "",
        };
        let query = format!("{}{}", SELECT_WITH_AUTHOR, order_clause);

        let rows = sqlx::query_as::<_, BookWithAuthor>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Case-insensitive substring match on title.
    ///
    /// SQLite's `lower()` only folds ASCII, so titles are folded here instead.
    pub async fn search_by_title(&self, text: &str) -> AppResult<Vec<BookWithAuthor>> {
        let needle = text.to_lowercase();
        let books = self.list(&BookOrder::Title).await?;
        Ok(books
            .into_iter()
            .filter(|book| book.title.to_lowercase().contains(&needle))
            .collect())
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, isbn, title, publication_year, author_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Get book by ID with its author's name
    pub async fn get_with_author(&self, id: i64) -> AppResult<BookWithAuthor> {
        let query = format!("{} WHERE b.id = $1", SELECT_WITH_AUTHOR);

        sqlx::query_as::<_, BookWithAuthor>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Insert a book. Fails on unknown author (foreign key) or duplicate ISBN.
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, title, publication_year, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, isbn, title, publication_year, author_id
            "#,
        )
        .bind(book.isbn.as_str())
        .bind(&book.title)
        .bind(book.publication_year)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a book
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    /// Number of books still referencing an author
    pub async fn count_for_author(&self, author_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
