use bookstore_db::{StoreError, StoreResult};
use sqlx::SqlitePool;

use super::models::{Book, BookDetails, BookReadOnly, NewBook};

const BOOK_COLUMNS: &str = "id, title, year, isbn, summary, image, price, author_id, version";

/// Data access for the `books` table.
#[derive(Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All books with their author's display name, joined in one query.
    pub async fn list_read_only(&self) -> StoreResult<Vec<BookReadOnly>> {
        let books = sqlx::query_as::<_, BookReadOnly>(
            r#"
            SELECT b.id, b.title, b.image, b.price, b.author_id,
                   a.first_name || ' ' || a.last_name AS author_name
            FROM books b
            INNER JOIN authors a ON a.id = b.author_id
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    pub async fn find_details(&self, id: i64) -> StoreResult<Option<BookDetails>> {
        let book = sqlx::query_as::<_, BookDetails>(
            r#"
            SELECT b.id, b.title, b.year, b.isbn, b.summary, b.image, b.price, b.author_id,
                   a.first_name || ' ' || a.last_name AS author_name
            FROM books b
            INNER JOIN authors a ON a.id = b.author_id
            WHERE b.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn find(&self, id: i64) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn exists(&self, id: i64) -> StoreResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, year, isbn, summary, image, price, author_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(book.title)
        .bind(book.year)
        .bind(book.isbn)
        .bind(book.summary)
        .bind(book.image)
        .bind(book.price)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persist every mutable field of `book`, guarded by its version.
    pub async fn update(&self, book: &Book) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = ?1, year = ?2, isbn = ?3, summary = ?4, image = ?5,
                price = ?6, author_id = ?7, version = version + 1
            WHERE id = ?8 AND version = ?9
            "#,
        )
        .bind(&book.title)
        .bind(book.year)
        .bind(&book.isbn)
        .bind(&book.summary)
        .bind(&book.image)
        .bind(book.price)
        .bind(book.author_id)
        .bind(book.id)
        .bind(book.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Concurrency);
        }

        Ok(())
    }

    /// Hard delete. Returns `false` when no row had this id.
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
