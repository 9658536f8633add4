//! # Match Handler
//!
//! Links a traveler to an exchange listing. The heavy lifting (existence
//! checks, transactional inserts of the match and its two placeholder
//! ratings) lives in [`crate::services::matching`].

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::error::AppResult;
use crate::models::AppState;
use crate::services::matching;

/// Request payload for creating a match
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    #[serde(rename = "idviajante")]
    pub traveler_id: i64,
    #[serde(rename = "idinterc")]
    pub exchange_id: i64,
}

/// Creates a match between a traveler and an exchange listing.
///
/// POST /match/criarMatch
///
/// # Returns
///
/// - `201 Created` - The created match object
/// - `404 Not Found` - Unknown traveler, listing, or listing host
/// - `500 Internal Server Error` - Database error (nothing is inserted)
#[instrument(
    skip_all,
    fields(
        traveler_id = payload.traveler_id,
        exchange_id = payload.exchange_id,
        request_id = %uuid::Uuid::new_v4()
    )
)]
pub async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateMatchRequest>,
) -> AppResult<impl IntoResponse> {
    let match_record =
        matching::create_match(&state.db_pool, payload.traveler_id, payload.exchange_id).await?;

    info!(match_id = match_record.id, "Match created");
    Ok((StatusCode::CREATED, Json(match_record)))
}
