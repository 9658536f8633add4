//! # Map Discovery Handler
//!
//! The map view: every listing with its host's coordinates and the host's
//! average rating formatted for display.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::error::AppResult;
use crate::models::AppState;
use crate::services::rating;

#[derive(Debug, FromRow)]
struct MapRow {
    id: i64,
    title: String,
    description: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: String,
    state: String,
    host_id: i64,
}

/// One listing pin on the map. The average is formatted to one decimal
/// place as a display string.
#[derive(Debug, Serialize)]
pub struct MapListing {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "estado")]
    pub state: String,
    #[serde(rename = "avaliacao")]
    pub rating_average: String,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
    pub data: Vec<MapListing>,
}

/// Lists every exchange for the map view.
///
/// POST /mapa/listar
///
/// # Returns
///
/// - `200 OK` - `{blOk, message, data}`
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn list_map(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let rows: Vec<MapRow> = sqlx::query_as(
        r#"
        SELECT e.id, e.title, e.description, h.latitude, h.longitude, h.city, h.state, e.host_id
        FROM exchanges e
        JOIN hosts h ON h.id = e.host_id
        ORDER BY e.id
        "#,
    )
    .fetch_all(&state.db_pool)
    .await?;

    let host_ids: Vec<i64> = rows.iter().map(|r| r.host_id).collect();
    let ratings = rating::ratings_by_host(&state.db_pool, &host_ids).await?;

    let data: Vec<MapListing> = rows
        .into_iter()
        .map(|row| {
            let average = ratings
                .get(&row.host_id)
                .map(|rs| rating::finalized_average(rs))
                .unwrap_or(0.0);
            MapListing {
                id: row.id,
                title: row.title,
                description: row.description,
                latitude: row.latitude,
                longitude: row.longitude,
                city: row.city,
                state: row.state,
                rating_average: rating::display_average(average),
            }
        })
        .collect();

    debug!(count = data.len(), "Map listings assembled");
    Ok(Json(MapResponse {
        bl_ok: true,
        message: "Exchanges listed successfully",
        data,
    }))
}
