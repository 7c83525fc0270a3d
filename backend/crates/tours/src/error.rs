//! Tour Error Types
//!
//! Resource-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Tours result type alias
pub type TourResult<T> = Result<T, TourError>;

#[derive(Debug, Error)]
pub enum TourError {
    /// Field validation failures, reported together
    #[error("Invalid input data. {}", .0.join(". "))]
    Validation(Vec<String>),

    /// Unique key already taken (tour name, one review per user and tour)
    #[error("Duplicate field value: \"{0}\". Please use another value.")]
    Duplicate(String),

    /// Unknown id, or a document hidden by the resource scope
    #[error("No document found with that ID!")]
    NotFound,

    #[error("Please provide latitude and longitude in the format lat,lng.")]
    InvalidLatLng,

    #[error("Please provide a valid distance.")]
    InvalidDistance,

    #[error("Invalid year: {0}.")]
    InvalidYear(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error raised by shared code
    #[error(transparent)]
    App(#[from] AppError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TourError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TourError::Validation(_)
            | TourError::Duplicate(_)
            | TourError::InvalidLatLng
            | TourError::InvalidDistance
            | TourError::InvalidYear(_) => ErrorKind::BadRequest,
            TourError::NotFound => ErrorKind::NotFound,
            TourError::App(err) => err.kind(),
            TourError::Database(_) | TourError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            TourError::Validation(messages) => AppError::validation(messages),
            TourError::Duplicate(value) => AppError::duplicate_field(&value),
            TourError::NotFound => AppError::no_document(),
            TourError::Database(err) => AppError::from(err),
            TourError::App(err) => err,
            TourError::Internal(msg) => AppError::internal(msg),
            err => AppError::new(err.kind(), err.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            TourError::Database(e) => {
                tracing::error!(error = %e, "Document store error");
            }
            TourError::Internal(msg) => {
                tracing::error!(message = %msg, "Tours internal error");
            }
            TourError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Tours request failed");
            }
            _ => {
                tracing::debug!(error = %self, "Tours request rejected");
            }
        }
    }
}

impl IntoResponse for TourError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(TourError::InvalidLatLng.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            TourError::InvalidYear("abc".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(TourError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_messages() {
        let err = TourError::Validation(vec![
            "A tour must have a name".to_string(),
            "A tour must have a price".to_string(),
        ])
        .into_app_error();
        assert_eq!(
            err.message(),
            "Invalid input data. A tour must have a name. A tour must have a price"
        );

        let err = TourError::Duplicate("The Forest Hiker".to_string()).into_app_error();
        assert_eq!(
            err.message(),
            "Duplicate field value: \"The Forest Hiker\". Please use another value."
        );

        let err = TourError::InvalidLatLng.into_app_error();
        assert_eq!(
            err.message(),
            "Please provide latitude and longitude in the format lat,lng."
        );
    }

    #[test]
    fn test_internal_is_hidden() {
        let err = TourError::Internal("bad row".to_string()).into_app_error();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Something went very wrong!");
    }
}
