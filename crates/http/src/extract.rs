//! Request extractors

use axum::{
    extract::{rejection::PathRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::validation::Validate;

/// JSON body that has passed [`Validate`] before the handler sees it.
///
/// Malformed JSON is rejected as a bad request; failing fields are rejected
/// as a validation error listing every field. Neither reaches the handler.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        let errors = value.validate();
        if !errors.is_empty() {
            return Err(AppError::invalid_fields(errors));
        }

        Ok(Self(value))
    }
}

/// Path parameters that answer with the JSON error body when they do not parse.
///
/// A segment that cannot be read as `T` (e.g. `abc` or an overflowing number
/// for an `i64` id) names no resource, so it is reported as not found.
#[derive(Debug, Clone)]
pub struct ResourcePath<T>(pub T);

impl<T, S> FromRequestParts<S> for ResourcePath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(PathRejection::FailedToDeserializePathParams(e)) => {
                tracing::debug!(error = %e.body_text(), "path parameter does not name a resource");
                Err(AppError::not_found(format!(
                    "No resource matches the requested path: {}",
                    e.body_text()
                )))
            }
            Err(rejection) => Err(AppError::Internal(anyhow::anyhow!(
                "path extraction failed: {}",
                rejection.body_text()
            ))),
        }
    }
}
