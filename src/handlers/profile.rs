//! # Profile Handlers
//!
//! Profile retrieval and the multipart profile update (fields plus optional
//! profile/cover photos). Only the submitted fields are changed; a supplied
//! password is re-hashed before storage.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Host, User};
use crate::services::password;
use crate::utils::upload;

/// Request payload for fetching a profile
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "contatoHost")]
    pub host: Option<Host>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    #[serde(rename = "dados")]
    pub data: ProfileData,
}

/// Fetches a user's profile with their host contact record, if any.
///
/// POST /perfil/listaPerfil
///
/// # Returns
///
/// - `200 OK` - `{blOk, dados}`
/// - `404 Not Found` - Unknown user id
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(user_id = payload.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProfileRequest>,
) -> AppResult<impl IntoResponse> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(payload.user_id)
        .fetch_optional(&state.db_pool)
        .await?;

    let Some(user) = user else {
        return Err(AppError::NotFound("User not found"));
    };

    let host = match user.host_id {
        Some(host_id) => {
            sqlx::query_as("SELECT * FROM hosts WHERE id = $1")
                .bind(host_id)
                .fetch_optional(&state.db_pool)
                .await?
        }
        None => None,
    };

    Ok(Json(ProfileResponse {
        bl_ok: true,
        data: ProfileData { user, host },
    }))
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
}

/// Updates a user's profile from a multipart form.
///
/// POST /perfil/atualizarPerfil MultipartForm
///
/// Text fields (all optional except `userId`): `nome`, `email`, `senha`,
/// `cpf`, `rg`, `nrpassa`, `facebook`, `twitter`, `instagram`, `linkedin`.
/// File fields: `fotoPerfil`, `fotoCapa` (PNG/JPG/WEBP).
///
/// Absent fields keep their stored values. Photos are written under the
/// user's upload directory before the row update and removed again if the
/// update fails.
///
/// # Returns
///
/// - `200 OK` - `{blOk, message}`
/// - `400 Bad Request` - Invalid multipart data or image
/// - `404 Not Found` - Unknown user id
/// - `500 Internal Server Error` - File system, hashing, or database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut user_id: Option<i64> = None;
    let mut name = None;
    let mut email = None;
    let mut plain_password: Option<String> = None;
    let mut cpf = None;
    let mut rg = None;
    let mut passport = None;
    let mut facebook = None;
    let mut twitter = None;
    let mut instagram = None;
    let mut linkedin = None;
    let mut profile_photo: Option<(Vec<u8>, &'static str)> = None;
    let mut cover_photo: Option<(Vec<u8>, &'static str)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| {
            error!(error = %e, "Error reading multipart form");
            AppError::BadRequest("Invalid multipart data")
        })?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "fotoPerfil" | "fotoCapa" => {
                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    error!(error = %e, "Error reading photo data");
                    AppError::BadRequest("Error reading file")
                })?;

                let extension = upload::validate_image(&content_type, &data).map_err(|e| {
                    warn!(error = %e, "Invalid photo in profile update");
                    AppError::BadRequest("Invalid image file")
                })?;

                if field_name == "fotoPerfil" {
                    profile_photo = Some((data.to_vec(), extension));
                } else {
                    cover_photo = Some((data.to_vec(), extension));
                }
            }
            name_str => {
                let text = field.text().await.map_err(|e| {
                    error!(error = %e, field = name_str, "Error reading form field");
                    AppError::BadRequest("Error reading form field")
                })?;

                match name_str {
                    "userId" => {
                        user_id = Some(text.parse().map_err(|_| {
                            warn!("Non-numeric user id in profile update");
                            AppError::BadRequest("Invalid user id")
                        })?);
                    }
                    "nome" => name = Some(text),
                    "email" => email = Some(text),
                    "senha" => plain_password = Some(text),
                    "cpf" => cpf = Some(text),
                    "rg" => rg = Some(text),
                    "nrpassa" => passport = Some(text),
                    "facebook" => facebook = Some(text),
                    "twitter" => twitter = Some(text),
                    "instagram" => instagram = Some(text),
                    "linkedin" => linkedin = Some(text),
                    other => {
                        warn!(field_name = other, "Unknown field in multipart form");
                    }
                }
            }
        }
    }

    let Some(user_id) = user_id else {
        return Err(AppError::BadRequest("User id field is required"));
    };

    let password_hash = match plain_password {
        Some(plain) => Some(password::hash(&plain).await?),
        None => None,
    };

    let user_dir = upload::owner_dir("users", "user", user_id);
    let mut saved_files = Vec::new();

    let mut profile_photo_path = None;
    if let Some((data, extension)) = &profile_photo {
        let filename = upload::save_image(&user_dir, extension, data).await?;
        profile_photo_path = Some(upload::asset_path("users", "user", user_id, &filename));
        saved_files.push(filename);
    }

    let mut cover_photo_path = None;
    if let Some((data, extension)) = &cover_photo {
        let filename = upload::save_image(&user_dir, extension, data).await?;
        cover_photo_path = Some(upload::asset_path("users", "user", user_id, &filename));
        saved_files.push(filename);
    }

    let result = sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash),
            cpf = COALESCE($4, cpf),
            rg = COALESCE($5, rg),
            passport = COALESCE($6, passport),
            facebook = COALESCE($7, facebook),
            twitter = COALESCE($8, twitter),
            instagram = COALESCE($9, instagram),
            linkedin = COALESCE($10, linkedin),
            profile_photo_path = COALESCE($11, profile_photo_path),
            cover_photo_path = COALESCE($12, cover_photo_path)
        WHERE id = $13
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(&cpf)
    .bind(&rg)
    .bind(&passport)
    .bind(&facebook)
    .bind(&twitter)
    .bind(&instagram)
    .bind(&linkedin)
    .bind(&profile_photo_path)
    .bind(&cover_photo_path)
    .bind(user_id)
    .execute(&state.db_pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() > 0 => {
            info!(user_id, "Profile updated");
            Ok(Json(UpdateProfileResponse {
                bl_ok: true,
                message: "Profile updated",
            }))
        }
        Ok(_) => {
            upload::cleanup_files(&user_dir, &saved_files).await;
            warn!(user_id, "Profile update for unknown user");
            Err(AppError::NotFound("User not found"))
        }
        Err(e) => {
            error!(error = %e, "Failed to update profile, cleaning up uploaded files");
            upload::cleanup_files(&user_dir, &saved_files).await;
            Err(e.into())
        }
    }
}
