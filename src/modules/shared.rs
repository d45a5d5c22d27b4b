//! Helpers shared by the resource modules.

use std::future::Future;

use axum::http::{header, HeaderMap, HeaderValue};
use bookstore_db::StoreResult;
use bookstore_http::{router::module_path, AppError};

/// Headers for a `201 Created` response pointing at the new resource.
pub fn location(module_name: &str, id: i64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let path = format!("{}/{}", module_path(module_name), id);
    if let Ok(value) = HeaderValue::from_str(&path) {
        headers.insert(header::LOCATION, value);
    }
    headers
}

pub fn not_found(resource: &str, id: i64) -> AppError {
    AppError::not_found(format!("{resource} {id} was not found"))
}

/// Decide what a version-checked write that matched no row means.
///
/// If the record is gone the caller gets "not found". If it is still there,
/// somebody else changed it in between; that is reported as a conflict and
/// never retried.
pub async fn resolve_write_conflict<F, Fut>(resource: &str, id: i64, exists: F) -> AppError
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = StoreResult<bool>>,
{
    match exists().await {
        Ok(false) => {
            tracing::warn!(resource, id, "record removed while being updated");
            not_found(resource, id)
        }
        Ok(true) => {
            tracing::error!(resource, id, "concurrent modification detected during update");
            AppError::conflict(
                vec![],
                format!("{resource} {id} was modified by another request"),
            )
        }
        Err(e) => e.into(),
    }
}
