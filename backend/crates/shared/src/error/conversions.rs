//! Error conversions - From implementations and HTTP rendering
//!
//! Provides automatic conversion from common error types to [`AppError`]
//! and the `{status, message}` error envelope returned to clients.

use std::sync::atomic::{AtomicBool, Ordering};

use super::app_error::AppError;
use super::kind::ErrorKind;

static DETAILED_ERRORS: AtomicBool = AtomicBool::new(false);

/// 開発モード用：エラーレスポンスに種別とデバッグ情報を含める
pub fn set_detailed_errors(enabled: bool) {
    DETAILED_ERRORS.store(enabled, Ordering::Relaxed);
}

/// 詳細エラー出力が有効かどうか
pub fn detailed_errors() -> bool {
    DETAILED_ERRORS.load(Ordering::Relaxed)
}

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Invalid id").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::validation([err.to_string()]).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// `Key (email)=(a@b.c) already exists.` から重複値を取り出す
#[cfg_attr(not(feature = "sqlx"), allow(dead_code))]
fn duplicate_value_from_detail(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once("=(")?;
    let (value, _) = rest.rsplit_once(')')?;
    Some(value)
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::no_document().with_source(err),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted").with_source(err)
            }
            sqlx::Error::Database(db_err) => {
                // PostgreSQL specific error codes
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    // Class 23 — Integrity Constraint Violation
                    Some("23505") => {
                        let detail = db_err
                            .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                            .and_then(|pg| pg.detail())
                            .and_then(duplicate_value_from_detail)
                            .unwrap_or("value")
                            .to_string();
                        AppError::duplicate_field(&detail)
                    }
                    Some("23502") => AppError::validation(["Required field is missing"]),
                    Some("23514") => AppError::validation(["Check constraint violation"]),
                    Some("22P02") => AppError::bad_request("Invalid input syntax"),
                    Some("23503") => AppError::conflict("Referenced document does not exist"),
                    // Class 53 — Insufficient Resources
                    Some("53000" | "53100" | "53200" | "53300") => {
                        AppError::service_unavailable("Database resource exhausted")
                    }
                    // Class 57 — Operator Intervention
                    Some("57000" | "57014" | "57P01" | "57P02" | "57P03") => {
                        AppError::service_unavailable("Database unavailable")
                    }
                    _ => AppError::internal("Database error"),
                };
                app_err.with_source(err)
            }
            sqlx::Error::Io(_) => {
                AppError::service_unavailable("Database connection error").with_source(err)
            }
            _ => AppError::internal("Database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        let status = rejection.status();
        let message = rejection.body_text();
        if status == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            AppError::new(ErrorKind::PayloadTooLarge, message)
        } else {
            AppError::bad_request(message)
        }
    }
}

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let mut body = serde_json::json!({
            "status": self.kind().status_label(),
            "message": self.public_message(),
        });

        if detailed_errors() {
            body["error"] = serde_json::json!(self.kind());
            body["detail"] = serde_json::json!(format!("{self:?}"));
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
        assert!(app_err.message().starts_with("Invalid input data."));
    }

    #[test]
    fn test_duplicate_value_from_detail() {
        assert_eq!(
            duplicate_value_from_detail("Key (email)=(jonas@example.io) already exists."),
            Some("jonas@example.io")
        );
        assert_eq!(
            duplicate_value_from_detail(
                "Key ((doc ->> 'name'::text))=(The Forest Hiker) already exists."
            ),
            Some("The Forest Hiker")
        );
        assert_eq!(duplicate_value_from_detail("no key here"), None);
    }
}
