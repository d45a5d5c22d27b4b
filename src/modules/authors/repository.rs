use bookstore_db::{StoreError, StoreResult};
use sqlx::SqlitePool;

use super::models::{Author, NewAuthor};

/// Data access for the `authors` table.
#[derive(Clone)]
pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> StoreResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, last_name, bio, version
            FROM authors
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    pub async fn find(&self, id: i64) -> StoreResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, last_name, bio, version
            FROM authors
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    pub async fn exists(&self, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM authors WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn insert(&self, author: NewAuthor) -> StoreResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, bio)
            VALUES (?1, ?2, ?3)
            RETURNING id, first_name, last_name, bio, version
            "#,
        )
        .bind(author.first_name)
        .bind(author.last_name)
        .bind(author.bio)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist every mutable field of `author`.
    ///
    /// The write only lands if the stored version still equals the one that
    /// was read; otherwise [`StoreError::Concurrency`] is returned and nothing
    /// changes.
    pub async fn update(&self, author: &Author) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET first_name = ?1, last_name = ?2, bio = ?3, version = version + 1
            WHERE id = ?4 AND version = ?5
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.bio)
        .bind(author.id)
        .bind(author.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Concurrency);
        }

        Ok(())
    }

    /// Hard delete. Returns `false` when no row had this id.
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
