//! # Authentication Handlers
//!
//! Credential verification and the password-reset flow:
//!
//! 1. `/login` verifies email + password against the stored bcrypt hash
//! 2. `/login/enviaCodigo` emails a 6-digit reset code (rate limited)
//! 3. `/login/validaCodigo` checks a submitted code against stored ones
//! 4. `/login/atualizaSenha` re-hashes and stores the new password
//!
//! Reset codes live on the user row with an expiry timestamp; updating the
//! password clears them.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Exchange, Host, User};
use crate::services::email::ResetCodeEmail;
use crate::services::password;
use crate::utils::{constant::*, validator::EMAIL_REGEX};

/// Request payload for credential login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Small `{blOk, message}` envelope shared by the reset-flow endpoints.
#[derive(Debug, Serialize)]
pub struct FlagResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
}

/// The host contact embedded in a login/profile response, with the host's
/// published listings included.
#[derive(Debug, Serialize)]
pub struct HostWithExchanges {
    #[serde(flatten)]
    pub host: Host,
    #[serde(rename = "intercambios")]
    pub exchanges: Vec<Exchange>,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "contatoHost")]
    pub host: Option<HostWithExchanges>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
    pub user: LoginUser,
}

/// Verifies credentials and returns the account with its host data.
///
/// POST /login
///
/// Authentication failures (unknown email, wrong password) are reported in
/// the body with `blOk: false` rather than an HTTP error status, which is
/// what the frontend consumes. The password hash is never serialized.
///
/// # Returns
///
/// - `200 OK` - `{blOk, message, user?}`
/// - `500 Internal Server Error` - Database or hashing failure
#[instrument(
    skip_all,
    fields(
        email = %payload.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Response> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.db_pool)
        .await?;

    let Some(user) = user else {
        debug!("Login attempted with unknown email");
        return Ok(Json(FlagResponse {
            bl_ok: false,
            message: "User does not exist",
        })
        .into_response());
    };

    if !password::verify(&payload.password, &user.password_hash).await? {
        debug!("Login attempted with wrong password");
        return Ok(Json(FlagResponse {
            bl_ok: false,
            message: "Incorrect password",
        })
        .into_response());
    }

    let host = match user.host_id {
        Some(host_id) => {
            let host: Host = sqlx::query_as("SELECT * FROM hosts WHERE id = $1")
                .bind(host_id)
                .fetch_one(&state.db_pool)
                .await?;
            let exchanges: Vec<Exchange> =
                sqlx::query_as("SELECT * FROM exchanges WHERE host_id = $1 ORDER BY id")
                    .bind(host_id)
                    .fetch_all(&state.db_pool)
                    .await?;
            Some(HostWithExchanges { host, exchanges })
        }
        None => None,
    };

    info!(user_id = user.id, "Login successful");
    Ok(Json(LoginResponse {
        bl_ok: true,
        message: "Login successful",
        user: LoginUser { user, host },
    })
    .into_response())
}

/// Request payload for sending a password-reset code
#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(regex(path = *EMAIL_REGEX))]
    pub email: String,
}

/// Sends a password-reset code to the given email address.
///
/// POST /login/enviaCodigo
///
/// Generates a 6-digit code, stores it on the user row with an expiry of
/// [`RESET_CODE_EXPIRY`], and emails it. Requests for the same address are
/// rate limited to one per [`EMAIL_RATE_LIMIT`].
///
/// # Returns
///
/// - `200 OK` - Code stored and emailed
/// - `400 Bad Request` - Invalid email format
/// - `404 Not Found` - No account with that email
/// - `429 Too Many Requests` - Rate limit exceeded
/// - `500 Internal Server Error` - Database or email failure
#[instrument(
    skip_all,
    fields(
        email = %payload.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn send_reset_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendCodeRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.validate().is_err() {
        warn!("Invalid email format provided");
        return Err(AppError::BadRequest("Invalid input"));
    }

    if let Some(entry) = state.rate_limit_cache.get(&payload.email) {
        if entry.elapsed() < EMAIL_RATE_LIMIT {
            let remaining = EMAIL_RATE_LIMIT - entry.elapsed();
            warn!(
                remaining_seconds = remaining.as_secs(),
                "Rate limit exceeded for email"
            );
            return Err(AppError::TooManyRequests(format!(
                "Rate limit exceeded. Try again in {} seconds.",
                remaining.as_secs()
            )));
        }
    }

    let code = format!("{:06}", rand::rng().random_range(0..1_000_000));
    let expires_at = OffsetDateTime::now_utc() + RESET_CODE_EXPIRY;

    let updated: Option<i64> = sqlx::query_scalar(
        "UPDATE users SET reset_code = $1, reset_code_expires_at = $2 WHERE email = $3 RETURNING id",
    )
    .bind(&code)
    .bind(expires_at)
    .bind(&payload.email)
    .fetch_optional(&state.db_pool)
    .await?;

    if updated.is_none() {
        warn!("Reset code requested for unknown email");
        return Err(AppError::NotFound("User not found"));
    }

    state
        .rate_limit_cache
        .insert(payload.email.clone(), Instant::now());

    state
        .email_service
        .deliver(&ResetCodeEmail::new(payload.email.clone(), code))
        .await?;

    info!("Reset code sent");
    Ok(Json(FlagResponse {
        bl_ok: true,
        message: "Reset code sent",
    }))
}

/// Request payload for validating a reset code
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateCodeRequest {
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateCodeResponse {
    pub message: &'static str,
}

/// Validates a previously emailed reset code.
///
/// POST /login/validaCodigo
///
/// # Returns
///
/// - `200 OK` - `{message}` when a matching, unexpired code exists
/// - `400 Bad Request` - `{blOk: false, message}` otherwise
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn validate_reset_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateCodeRequest>,
) -> AppResult<Response> {
    if payload.validate().is_err() {
        warn!("Invalid reset code format");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let user: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM users WHERE reset_code = $1 AND reset_code_expires_at > now()",
    )
    .bind(&payload.code)
    .fetch_optional(&state.db_pool)
    .await?;

    match user {
        Some(user_id) => {
            info!(user_id, "Reset code validated");
            Ok(Json(ValidateCodeResponse {
                message: "Code validated successfully",
            })
            .into_response())
        }
        None => {
            warn!("Invalid or expired reset code provided");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(FlagResponse {
                    bl_ok: false,
                    message: "Invalid or expired code",
                }),
            )
                .into_response())
        }
    }
}

/// Request payload for updating a password after code validation
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(regex(path = *EMAIL_REGEX))]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Stores a new password hash and clears any pending reset code.
///
/// POST /login/atualizaSenha
///
/// # Returns
///
/// - `200 OK` - Password updated
/// - `400 Bad Request` - Invalid input
/// - `404 Not Found` - No account with that email
/// - `500 Internal Server Error` - Database or hashing failure
#[instrument(
    skip_all,
    fields(
        email = %payload.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn update_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.validate().is_err() {
        warn!("Invalid password update payload");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let password_hash = password::hash(&payload.password).await?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $1, reset_code = NULL, reset_code_expires_at = NULL
        WHERE email = $2
        "#,
    )
    .bind(&password_hash)
    .bind(&payload.email)
    .execute(&state.db_pool)
    .await?;

    if result.rows_affected() == 0 {
        warn!("Password update requested for unknown email");
        return Err(AppError::NotFound("User not found"));
    }

    info!("Password updated");
    Ok(Json(FlagResponse {
        bl_ok: true,
        message: "Password updated successfully",
    }))
}
