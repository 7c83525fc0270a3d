//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token in the Authorization header or the cookie
    #[error("You are not logged in! Please log in to get access!")]
    NotLoggedIn,

    /// Malformed token or bad signature
    #[error("Invalid token. Please log in again!")]
    InvalidToken,

    #[error("Your token has expired. Please log in again!")]
    TokenExpired,

    /// Token subject was deleted or deactivated
    #[error("The user belonging to this token no longer exists.")]
    UserGone,

    /// Token issued before the last password change
    #[error("User recently changed password! Please log in again!")]
    PasswordChanged,

    #[error("You do not have permission to perform this action!")]
    Forbidden,

    #[error("Please provide email and password")]
    MissingCredentials,

    #[error("Incorrect email and/or password!")]
    IncorrectCredentials,

    #[error("The entered password is invalid. Please try again!")]
    IncorrectCurrentPassword,

    #[error("There is no user with that email address!")]
    NoUserWithEmail,

    #[error("Token is invalid or has expired!")]
    ResetTokenInvalid,

    #[error("There was an error sending the email. Try again later!")]
    EmailDelivery,

    #[error("This route is not for password updates! Please use /updateMyPassword")]
    NotForPasswordUpdates,

    #[error("This route is not yet defined! Please use /signup instead!")]
    UseSignup,

    /// Field validation failures, reported together
    #[error("Invalid input data. {}", .0.join(". "))]
    Validation(Vec<String>),

    /// Email already registered
    #[error("Duplicate field value: \"{0}\". Please use another value.")]
    DuplicateEmail(String),

    #[error("No document found with that ID!")]
    UserNotFound,

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

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NotLoggedIn
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UserGone
            | AuthError::PasswordChanged
            | AuthError::IncorrectCredentials
            | AuthError::IncorrectCurrentPassword => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::MissingCredentials
            | AuthError::ResetTokenInvalid
            | AuthError::NotForPasswordUpdates
            | AuthError::Validation(_)
            | AuthError::DuplicateEmail(_) => ErrorKind::BadRequest,
            AuthError::NoUserWithEmail | AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::App(err) => err.kind(),
            AuthError::EmailDelivery
            | AuthError::UseSignup
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
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
            AuthError::Validation(messages) => AppError::validation(messages),
            AuthError::DuplicateEmail(email) => AppError::duplicate_field(&email),
            AuthError::UserNotFound => AppError::no_document(),
            AuthError::Database(err) => AppError::from(err),
            AuthError::App(err) => err,
            AuthError::Internal(msg) => AppError::internal(msg),
            // Operational failures the client is told about
            err @ (AuthError::EmailDelivery | AuthError::UseSignup) => {
                AppError::new(err.kind(), err.to_string()).exposed()
            }
            err => AppError::new(err.kind(), err.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::EmailDelivery => {
                tracing::error!("Password reset email could not be delivered");
            }
            AuthError::App(e) if e.is_server_error() => {
                tracing::error!(error = ?e, "Auth request failed");
            }
            AuthError::IncorrectCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken | AuthError::PasswordChanged | AuthError::UserGone => {
                tracing::warn!(error = %self, "Rejected access token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
