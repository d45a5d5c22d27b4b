//! Author HTTP handlers
//!
//! - `GET /api/Authors` - List authors
//! - `GET /api/Authors/{id}` - Get a single author
//! - `PUT /api/Authors/{id}` - Replace an author's mutable fields
//! - `POST /api/Authors` - Create an author
//! - `DELETE /api/Authors/{id}` - Delete an author

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bookstore_db::StoreError;
use bookstore_http::{AppError, ResourcePath, ValidatedJson};

use super::models::{AuthorCreate, AuthorReadOnly, AuthorUpdate, NewAuthor};
use super::repository::AuthorRepository;
use super::MODULE_NAME;
use crate::modules::shared;

const RESOURCE: &str = "Author";

pub fn router(repo: AuthorRepository) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .with_state(repo)
}

#[tracing::instrument(skip(repo))]
async fn list_authors(
    State(repo): State<AuthorRepository>,
) -> Result<Json<Vec<AuthorReadOnly>>, AppError> {
    tracing::info!("listing authors");

    let authors = repo.list().await?;

    Ok(Json(authors.into_iter().map(AuthorReadOnly::from).collect()))
}

#[tracing::instrument(skip(repo))]
async fn get_author(
    State(repo): State<AuthorRepository>,
    ResourcePath(id): ResourcePath<i64>,
) -> Result<Json<AuthorReadOnly>, AppError> {
    let author = repo.find(id).await?.ok_or_else(|| {
        tracing::warn!(id, "author not found");
        shared::not_found(RESOURCE, id)
    })?;

    Ok(Json(author.into()))
}

#[tracing::instrument(skip(repo, dto))]
async fn update_author(
    State(repo): State<AuthorRepository>,
    ResourcePath(id): ResourcePath<i64>,
    ValidatedJson(dto): ValidatedJson<AuthorUpdate>,
) -> Result<StatusCode, AppError> {
    if id != dto.id {
        tracing::warn!(id, body_id = dto.id, "update id does not match path");
        return Err(AppError::bad_request(format!(
            "Path id {} does not match body id {}",
            id, dto.id
        )));
    }

    let mut author = repo.find(id).await?.ok_or_else(|| {
        tracing::warn!(id, "author not found for update");
        shared::not_found(RESOURCE, id)
    })?;

    dto.apply_to(&mut author);

    match repo.update(&author).await {
        Ok(()) => {
            tracing::info!(id, "author updated");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(StoreError::Concurrency) => {
            Err(shared::resolve_write_conflict(RESOURCE, id, || repo.exists(id)).await)
        }
        Err(e) => Err(e.into()),
    }
}

#[tracing::instrument(skip(repo, dto))]
async fn create_author(
    State(repo): State<AuthorRepository>,
    ValidatedJson(dto): ValidatedJson<AuthorCreate>,
) -> Result<Response, AppError> {
    let author = repo.insert(NewAuthor::from(dto)).await?;

    tracing::info!(id = author.id, "author created");

    let headers = shared::location(MODULE_NAME, author.id);
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthorReadOnly::from(author)),
    )
        .into_response())
}

#[tracing::instrument(skip(repo))]
async fn delete_author(
    State(repo): State<AuthorRepository>,
    ResourcePath(id): ResourcePath<i64>,
) -> Result<StatusCode, AppError> {
    match repo.delete(id).await {
        Ok(true) => {
            tracing::info!(id, "author deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => {
            tracing::warn!(id, "author not found for delete");
            Err(shared::not_found(RESOURCE, id))
        }
        Err(StoreError::ForeignKey) => Err(AppError::conflict(
            vec![],
            format!("{RESOURCE} {id} still has books and cannot be deleted"),
        )),
        Err(e) => Err(e.into()),
    }
}
