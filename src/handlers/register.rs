//! # Registration Handlers
//!
//! User signup and host promotion. Registration stores a bcrypt hash and
//! creates a traveler account; promotion creates the host contact record and
//! flips the user's kind inside one transaction, so a failed update never
//! leaves an orphaned host row.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{AppState, UserKind};
use crate::services::password;
use crate::utils::validator::EMAIL_REGEX;

/// Request payload for user registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[validate(regex(path = *EMAIL_REGEX))]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    #[serde(rename = "passaporte")]
    pub passport: Option<String>,
    #[serde(rename = "sexo")]
    pub gender: Option<String>,
    #[serde(rename = "nacionalidade")]
    pub nationality: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Registers a new traveler account.
///
/// POST /cadastro/cadastroUsuario
///
/// The password is hashed with bcrypt before storage; the row is created
/// with active status and traveler kind.
///
/// # Returns
///
/// - `201 Created` - Account created
/// - `400 Bad Request` - Invalid input or email already registered
/// - `500 Internal Server Error` - Database or hashing failure
#[instrument(
    skip_all,
    fields(
        email = %payload.email,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.validate().is_err() {
        warn!("Invalid registration payload");
        return Err(AppError::BadRequest("Invalid input"));
    }

    let password_hash = password::hash(&payload.password).await?;

    let result = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (name, email, password_hash, cpf, rg, passport, gender, nationality)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.cpf)
    .bind(&payload.rg)
    .bind(&payload.passport)
    .bind(&payload.gender)
    .bind(&payload.nationality)
    .fetch_one(&state.db_pool)
    .await;

    match result {
        Ok(user_id) => {
            info!(user_id, "User registered successfully");
            Ok((
                StatusCode::CREATED,
                Json(RegisterResponse {
                    success: true,
                    message: "User registered successfully",
                }),
            ))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            warn!("Registration attempted with an email already in use");
            Err(AppError::BadRequest("Email already registered"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Request payload for promoting a user to host
#[derive(Debug, Deserialize)]
pub struct BecomeHostRequest {
    #[serde(rename = "idUsuario")]
    pub user_id: i64,
    #[serde(rename = "nomePropriedade")]
    pub property_name: String,
    #[serde(default, rename = "rua")]
    pub street: String,
    #[serde(default, rename = "numero")]
    pub number: String,
    #[serde(default, rename = "complemento")]
    pub complement: String,
    #[serde(default, rename = "cidade")]
    pub city: String,
    #[serde(default, rename = "estado")]
    pub state: String,
    #[serde(default, rename = "cep")]
    pub postal_code: String,
    #[serde(default, rename = "telefone")]
    pub phone: String,
    #[serde(default, rename = "tipoPropriedade")]
    pub property_kind: String,
    #[serde(default)]
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BecomeHostResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "idHost")]
    pub host_id: i64,
}

/// Promotes an existing user to host.
///
/// POST /cadastro/tornaHost
///
/// Creates the host contact record and updates the user to kind `H` with the
/// new host reference, both inside one transaction.
///
/// # Returns
///
/// - `201 Created` - Host created, user promoted, returns the new host id
/// - `404 Not Found` - User does not exist (no host row is kept)
/// - `500 Internal Server Error` - Database failure
#[instrument(
    skip_all,
    fields(
        user_id = payload.user_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn become_host(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BecomeHostRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.db_pool.begin().await?;

    let user: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(payload.user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user.is_none() {
        warn!("Host promotion requested for unknown user");
        return Err(AppError::NotFound("User not found"));
    }

    let host_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO hosts (property_name, street, number, complement, city, state,
                           postal_code, phone, property_kind, email, latitude, longitude)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(&payload.property_name)
    .bind(&payload.street)
    .bind(&payload.number)
    .bind(&payload.complement)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.postal_code)
    .bind(&payload.phone)
    .bind(&payload.property_kind)
    .bind(&payload.email)
    .bind(payload.latitude)
    .bind(payload.longitude)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE users SET kind = $1, host_id = $2 WHERE id = $3")
        .bind(UserKind::Host)
        .bind(host_id)
        .bind(payload.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(host_id, "User promoted to host");
    Ok((
        StatusCode::CREATED,
        Json(BecomeHostResponse {
            success: true,
            message: "Profile upgraded to host",
            host_id,
        }),
    ))
}
