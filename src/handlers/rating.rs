//! # Rating Handlers
//!
//! Placeholder creation, the per-user rating list with its finalized
//! average, and the update that turns a placeholder into a submitted rating.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Rating};
use crate::services::rating;

/// Request payload for creating a standalone placeholder rating
#[derive(Debug, Deserialize)]
pub struct CreateRatingRequest {
    #[serde(rename = "avaliado")]
    pub subject_id: i64,
    #[serde(rename = "avaliador")]
    pub author_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateRatingResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "idavaliacao")]
    pub rating_id: i64,
}

/// Creates an empty placeholder rating between two users.
///
/// POST /avaliacao/criaAvaliacao
///
/// # Returns
///
/// - `201 Created` - `{success, message, idavaliacao}`
/// - `500 Internal Server Error` - Database error (e.g. unknown user ids)
#[instrument(
    skip_all,
    fields(
        subject_id = payload.subject_id,
        author_id = payload.author_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRatingRequest>,
) -> AppResult<impl IntoResponse> {
    let rating_id: i64 = sqlx::query_scalar(
        "INSERT INTO ratings (subject_id, author_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(payload.subject_id)
    .bind(payload.author_id)
    .fetch_one(&state.db_pool)
    .await?;

    info!(rating_id, "Placeholder rating created");
    Ok((
        StatusCode::CREATED,
        Json(CreateRatingResponse {
            success: true,
            message: "Rating created successfully",
            rating_id,
        }),
    ))
}

/// Request payload for listing a user's ratings
#[derive(Debug, Deserialize)]
pub struct ListRatingsRequest {
    #[serde(rename = "idusuario")]
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RatingCollections {
    #[serde(rename = "avaliado")]
    pub received: Vec<Rating>,
    #[serde(rename = "avaliador")]
    pub authored: Vec<Rating>,
    #[serde(rename = "media")]
    pub average: f64,
}

#[derive(Debug, Serialize)]
pub struct ListRatingsResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
    #[serde(rename = "avaliacoes")]
    pub ratings: RatingCollections,
}

#[derive(Debug, Serialize)]
struct NoRatingsResponse {
    #[serde(rename = "blOk")]
    bl_ok: bool,
    message: &'static str,
}

/// Lists the ratings a user has received and authored, with the finalized
/// average over the received ones.
///
/// POST /avaliacao/listaAvaliacoes
///
/// # Returns
///
/// - `200 OK` - `{blOk: true, avaliacoes: {avaliado, avaliador, media}}`,
///   or `{blOk: false, message}` when the user has no ratings at all
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(user_id = payload.user_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ListRatingsRequest>,
) -> AppResult<Response> {
    let received: Vec<Rating> =
        sqlx::query_as("SELECT * FROM ratings WHERE subject_id = $1 ORDER BY id")
            .bind(payload.user_id)
            .fetch_all(&state.db_pool)
            .await?;
    let authored: Vec<Rating> =
        sqlx::query_as("SELECT * FROM ratings WHERE author_id = $1 ORDER BY id")
            .bind(payload.user_id)
            .fetch_all(&state.db_pool)
            .await?;

    if received.is_empty() && authored.is_empty() {
        return Ok(Json(NoRatingsResponse {
            bl_ok: false,
            message: "No ratings found",
        })
        .into_response());
    }

    let average = rating::finalized_average(&received);

    Ok(Json(ListRatingsResponse {
        bl_ok: true,
        message: "Ratings found",
        ratings: RatingCollections {
            received,
            authored,
            average,
        },
    })
    .into_response())
}

/// Request payload for submitting a rating
#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    #[serde(rename = "idavaliacao")]
    pub rating_id: i64,
    #[serde(rename = "avaliacao")]
    pub score: i32,
    #[serde(rename = "descricao")]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRatingResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
    #[serde(rename = "avaliacaoAtualizada")]
    pub rating: Rating,
}

/// Submits a participant's actual score and description for a rating.
///
/// POST /avaliacao/atualizaAvaliacao
///
/// Sets the finalized flag unconditionally; from then on the score counts
/// toward the subject's average. Scores outside 0..=5 are rejected.
///
/// # Returns
///
/// - `200 OK` - `{blOk, message, avaliacaoAtualizada}`
/// - `400 Bad Request` - Score out of range
/// - `404 Not Found` - Unknown rating id
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(rating_id = payload.rating_id, request_id = %uuid::Uuid::new_v4()))]
pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateRatingRequest>,
) -> AppResult<impl IntoResponse> {
    rating::validate_score(payload.score)?;

    let updated: Option<Rating> = sqlx::query_as(
        r#"
        UPDATE ratings
        SET score = $1, description = $2, finalized = TRUE
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(payload.score)
    .bind(&payload.description)
    .bind(payload.rating_id)
    .fetch_optional(&state.db_pool)
    .await?;

    let Some(rating) = updated else {
        warn!("Rating update for unknown id");
        return Err(AppError::NotFound("Rating not found"));
    };

    info!(rating_id = rating.id, score = rating.score, "Rating finalized");
    Ok(Json(UpdateRatingResponse {
        bl_ok: true,
        message: "Rating updated successfully",
        rating,
    }))
}
