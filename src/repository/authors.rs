//! Authors repository

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, NewAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Sqlite>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List all authors ordered by name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, name, birth_date, date_of_death FROM authors ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "SELECT id, name, birth_date, date_of_death FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Insert an author and return the stored row
    pub async fn create(&self, author: &NewAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (name, birth_date, date_of_death)
            VALUES ($1, $2, $3)
            RETURNING id, name, birth_date, date_of_death
            "#,
        )
        .bind(&author.name)
        .bind(author.birth_date)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete an author
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
