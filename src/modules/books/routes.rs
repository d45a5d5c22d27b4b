//! Book HTTP handlers
//!
//! - `GET /api/Books` - List books with their author's name
//! - `GET /api/Books/{id}` - Get book details
//! - `PUT /api/Books/{id}` - Replace a book's mutable fields
//! - `POST /api/Books` - Create a book
//! - `DELETE /api/Books/{id}` - Delete a book

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookstore_db::StoreError;
use bookstore_http::{AppError, FieldError, ResourcePath, ValidatedJson};

use super::models::{BookCreate, BookDetails, BookReadOnly, BookUpdate, NewBook};
use super::repository::BookRepository;
use super::MODULE_NAME;
use crate::modules::shared;

const RESOURCE: &str = "Book";

pub fn router(repo: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(repo)
}

/// A write referencing a missing author is a client error on `authorId`.
fn unknown_author(author_id: i64) -> AppError {
    AppError::invalid_fields(vec![FieldError {
        field: "authorId",
        message: format!("authorId {author_id} does not reference an existing author"),
    }])
}

#[tracing::instrument(skip(repo))]
async fn list_books(
    State(repo): State<BookRepository>,
) -> Result<Json<Vec<BookReadOnly>>, AppError> {
    tracing::info!("listing books");

    Ok(Json(repo.list_read_only().await?))
}

#[tracing::instrument(skip(repo))]
async fn get_book(
    State(repo): State<BookRepository>,
    ResourcePath(id): ResourcePath<i64>,
) -> Result<Json<BookDetails>, AppError> {
    let book = repo.find_details(id).await?.ok_or_else(|| {
        tracing::warn!(id, "book not found");
        shared::not_found(RESOURCE, id)
    })?;

    Ok(Json(book))
}

#[tracing::instrument(skip(repo, dto))]
async fn update_book(
    State(repo): State<BookRepository>,
    ResourcePath(id): ResourcePath<i64>,
    ValidatedJson(dto): ValidatedJson<BookUpdate>,
) -> Result<StatusCode, AppError> {
    if id != dto.id {
        tracing::warn!(id, body_id = dto.id, "update id does not match path");
        return Err(AppError::bad_request(format!(
            "Path id {} does not match body id {}",
            id, dto.id
        )));
    }

    let mut book = repo.find(id).await?.ok_or_else(|| {
        tracing::warn!(id, "book not found for update");
        shared::not_found(RESOURCE, id)
    })?;

    let author_id = dto.author_id;
    dto.apply_to(&mut book);

    match repo.update(&book).await {
        Ok(()) => {
            tracing::info!(id, "book updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::Concurrency) => {
            Err(shared::resolve_write_conflict(RESOURCE, id, || repo.exists(id)).await)
        }
        Err(StoreError::ForeignKey) => Err(unknown_author(author_id)),
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(repo, dto))]
async fn create_book(
    State(repo): State<BookRepository>,
    ValidatedJson(dto): ValidatedJson<BookCreate>,
) -> Result<Response, AppError> {
    let author_id = dto.author_id;

    let book = match repo.insert(NewBook::from(dto)).await {
        Ok(book) => book,
        Err(StoreError::ForeignKey) => return Err(unknown_author(author_id)),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(id = book.id, author_id, "book created");

    let headers = shared::location(MODULE_NAME, book.id);
    Ok((StatusCode::CREATED, headers, Json(book)).into_response())
}

#[tracing::instrument(skip(repo))]
async fn delete_book(
    State(repo): State<BookRepository>,
    ResourcePath(id): ResourcePath<i64>,
) -> Result<StatusCode, AppError> {
    if !repo.delete(id).await? {
        tracing::warn!(id, "book not found for delete");
        return Err(shared::not_found(RESOURCE, id));
    }

    tracing::info!(id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
