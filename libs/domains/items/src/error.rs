use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Item not modified: {0}")]
    NotModified(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Missing identifier: {0}")]
    MissingIdentifier(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::InvalidIdentifier(msg) => AppError::InvalidIdentifier(msg),
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::NotModified(id) => AppError::NotModified(format!("Item {} not modified", id)),
            ItemError::Validation(msg) => AppError::UnprocessableEntity(msg),
            ItemError::StoreUnavailable(msg) => AppError::ServiceUnavailable(msg),
            ItemError::MissingIdentifier(msg) => AppError::MissingIdentifier(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ItemError {
    fn from(err: mongodb::error::Error) -> Self {
        ItemError::StoreUnavailable(err.to_string())
    }
}

impl From<JsonRejection> for ItemError {
    fn from(rejection: JsonRejection) -> Self {
        ItemError::Validation(rejection.body_text())
    }
}
