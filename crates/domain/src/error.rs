//! Framework-agnostic error taxonomy for the coordination core.
//!
//! Kept separate from the HTTP-facing `ApiError` in the `api` crate so the
//! domain and persistence layers never depend on axum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("cannot accept: {0}")]
    CannotAccept(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("resource not found".into()),
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                DomainError::BackendUnavailable(err.to_string())
            }
            other => DomainError::BackendUnavailable(other.to_string()),
        }
    }
}
