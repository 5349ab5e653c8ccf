use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::models::UserId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0}")]
    InvalidName(String),

    #[error("{0}")]
    InvalidEmail(String),

    #[error("{0}")]
    InvalidIdentifier(String),

    #[error("{0}")]
    InvalidPagination(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("User {0} not found")]
    NotFound(UserId),

    #[error("No user ids left to allocate")]
    IdsExhausted,
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::InvalidName(_) => "invalid_name",
            UserError::InvalidEmail(_) => "invalid_email",
            UserError::InvalidIdentifier(_) => "invalid_identifier",
            UserError::InvalidPagination(_) => "invalid_pagination",
            UserError::DuplicateEmail(_) => "duplicate_email",
            UserError::NotFound(_) => "not_found",
            UserError::IdsExhausted => "ids_exhausted",
        }
    }

    /// Input field a validation failure refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            UserError::InvalidName(_) => Some("name"),
            UserError::InvalidEmail(_) | UserError::DuplicateEmail(_) => Some("email"),
            UserError::InvalidIdentifier(_) => Some("id"),
            UserError::InvalidPagination(_) => Some("pagination"),
            UserError::NotFound(_) | UserError::IdsExhausted => None,
        }
    }
}

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidIdentifier(_)
            | UserError::InvalidPagination(_) => AppError::Validation {
                field: err.field().unwrap_or("request").to_string(),
                message: err.to_string(),
            },
            UserError::DuplicateEmail(_) => {
                AppError::Conflict("User with this email already exists".to_string())
            }
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::IdsExhausted => AppError::ServiceUnavailable(err.to_string()),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
