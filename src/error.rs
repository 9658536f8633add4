//! # Centralized Error Handling
//!
//! Unified error type for the application. Every failure surfaced to a client
//! is rendered as the JSON envelope `{"blOk": false, "success": false,
//! "message": "..."}` so both envelope families of the public API decode it,
//! with the HTTP status carrying the error class.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::services::email::EmailError;

/// Central application error type that encompasses all failure conditions
/// reachable from a request handler.
///
/// Database, hashing, email and filesystem errors are logged with their
/// details and collapsed into generic client messages; client-caused errors
/// carry their message through.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("database error")]
    Db(#[from] sqlx::Error),

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("too many requests: {0}")]
    TooManyRequests(String),

    #[error("password hashing error")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("email delivery error")]
    Email(#[from] EmailError),

    #[error("file system error")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "blOk")]
    bl_ok: bool,
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Db(e) => {
                error!(?e, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".into())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.into()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.into()),
            AppError::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            AppError::Hashing(e) => {
                error!(?e, "Password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Password processing error".into(),
                )
            }
            AppError::Email(e) => {
                error!(%e, "Email delivery failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".into(),
                )
            }
            AppError::Io(e) => {
                error!(?e, "File system error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "File system error".into())
            }
        };

        let body = Json(ErrorBody {
            bl_ok: false,
            success: false,
            message,
        });
        (status, body).into_response()
    }
}

/// Convenience Result type alias that uses AppError as the error type.
pub type AppResult<T> = Result<T, AppError>;
