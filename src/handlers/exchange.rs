//! # Exchange Listing Handlers
//!
//! Listing retrieval and creation. Creation accepts a multipart form with
//! the listing fields plus up to 10 images; images are validated for format
//! (PNG/JPG/WEBP), stored under a per-host directory, and referenced by
//! relative `/assets` paths on the listing row.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AppState, Exchange, Host, Rating};
use crate::services::rating;
use crate::utils::constant::MAX_EXCHANGE_IMAGES;
use crate::utils::upload;

/// A listing joined with its host contact and the host's average rating.
#[derive(Debug, Serialize)]
pub struct ExchangeView {
    #[serde(flatten)]
    pub exchange: Exchange,
    #[serde(rename = "contatoHost")]
    pub host: Option<Host>,
    #[serde(rename = "avaliacao")]
    pub rating_average: f64,
}

/// Lists every published exchange with host and rating data.
///
/// GET /intercambios/buscar
///
/// # Returns
///
/// - `200 OK` - Array of listings
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn list_exchanges(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let exchanges: Vec<Exchange> = sqlx::query_as("SELECT * FROM exchanges ORDER BY id")
        .fetch_all(&state.db_pool)
        .await?;

    let host_ids: Vec<i64> = exchanges.iter().map(|e| e.host_id).collect();

    let hosts: Vec<Host> = sqlx::query_as("SELECT * FROM hosts WHERE id = ANY($1)")
        .bind(&host_ids)
        .fetch_all(&state.db_pool)
        .await?;
    let mut ratings = rating::ratings_by_host(&state.db_pool, &host_ids).await?;

    let views: Vec<ExchangeView> = exchanges
        .into_iter()
        .map(|exchange| {
            let host = hosts.iter().find(|h| h.id == exchange.host_id).cloned();
            let host_ratings: Vec<Rating> =
                ratings.remove(&exchange.host_id).unwrap_or_default();
            ExchangeView {
                rating_average: rating::finalized_average(&host_ratings),
                exchange,
                host,
            }
        })
        .collect();

    debug!(count = views.len(), "Exchanges listed");
    Ok(Json(views))
}

/// Request payload for fetching a single listing
#[derive(Debug, Deserialize)]
pub struct ExchangeByIdRequest {
    pub id: i64,
}

/// Fetches one exchange listing with host and rating data.
///
/// POST /intercambios/buscarId
///
/// # Returns
///
/// - `200 OK` - The listing object
/// - `404 Not Found` - Unknown listing id
/// - `500 Internal Server Error` - Database error
#[instrument(skip_all, fields(exchange_id = payload.id, request_id = %uuid::Uuid::new_v4()))]
pub async fn get_exchange(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExchangeByIdRequest>,
) -> AppResult<impl IntoResponse> {
    let exchange: Option<Exchange> = sqlx::query_as("SELECT * FROM exchanges WHERE id = $1")
        .bind(payload.id)
        .fetch_optional(&state.db_pool)
        .await?;

    let Some(exchange) = exchange else {
        return Err(AppError::NotFound("Exchange not found"));
    };

    let host: Option<Host> = sqlx::query_as("SELECT * FROM hosts WHERE id = $1")
        .bind(exchange.host_id)
        .fetch_optional(&state.db_pool)
        .await?;

    let mut ratings = rating::ratings_by_host(&state.db_pool, &[exchange.host_id]).await?;
    let host_ratings = ratings.remove(&exchange.host_id).unwrap_or_default();

    Ok(Json(ExchangeView {
        rating_average: rating::finalized_average(&host_ratings),
        exchange,
        host,
    }))
}

#[derive(Debug, Serialize)]
pub struct CreateExchangeResponse {
    #[serde(rename = "blOk")]
    pub bl_ok: bool,
    pub message: &'static str,
    #[serde(rename = "intercambio")]
    pub exchange: Exchange,
}

/// Creates an exchange listing with uploaded images.
///
/// POST /intercambios/cadastrar MultipartForm
///
/// Text fields: `nmlocal`, `titulo`, `descricao`, `servicos`, `beneficios`,
/// `duracao`, `idhost`. File field: `images` (repeatable, at most 10).
///
/// Files are written before the database insert; if the insert fails they
/// are removed again.
///
/// # Returns
///
/// - `201 Created` - `{blOk, message, intercambio}`
/// - `400 Bad Request` - Missing/invalid fields, bad image, or too many images
/// - `404 Not Found` - Unknown host id
/// - `500 Internal Server Error` - File system or database error
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn create_exchange(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut place_name = String::new();
    let mut title = None;
    let mut description = String::new();
    let mut services = String::new();
    let mut benefits = String::new();
    let mut duration = String::new();
    let mut host_id: Option<i64> = None;
    let mut images: Vec<(Vec<u8>, &'static str)> = Vec::new();

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
            "images" => {
                if images.len() == MAX_EXCHANGE_IMAGES {
                    warn!("Too many images in listing upload");
                    return Err(AppError::BadRequest(
                        "A listing can have at most 10 images",
                    ));
                }

                let content_type = field.content_type().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| {
                    error!(error = %e, "Error reading image data");
                    AppError::BadRequest("Error reading file")
                })?;

                match upload::validate_image(&content_type, &data) {
                    Ok(extension) => images.push((data.to_vec(), extension)),
                    Err(e) => {
                        warn!(error = %e, "Invalid image in listing upload");
                        return Err(AppError::BadRequest("Invalid image file"));
                    }
                }
            }
            name => {
                let text = field.text().await.map_err(|e| {
                    error!(error = %e, field = name, "Error reading form field");
                    AppError::BadRequest("Error reading form field")
                })?;

                match name {
                    "nmlocal" => place_name = text,
                    "titulo" => title = Some(text),
                    "descricao" => description = text,
                    "servicos" => services = text,
                    "beneficios" => benefits = text,
                    "duracao" => duration = text,
                    "idhost" => {
                        host_id = Some(text.parse().map_err(|_| {
                            warn!("Non-numeric host id in listing upload");
                            AppError::BadRequest("Invalid host id")
                        })?);
                    }
                    other => {
                        warn!(field_name = other, "Unknown field in multipart form");
                    }
                }
            }
        }
    }

    let Some(title) = title else {
        return Err(AppError::BadRequest("Title field is required"));
    };
    let Some(host_id) = host_id else {
        return Err(AppError::BadRequest("Host id field is required"));
    };

    let host: Option<i64> = sqlx::query_scalar("SELECT id FROM hosts WHERE id = $1")
        .bind(host_id)
        .fetch_optional(&state.db_pool)
        .await?;
    if host.is_none() {
        warn!(host_id, "Listing creation for unknown host");
        return Err(AppError::NotFound("Host not found"));
    }

    let host_dir = upload::owner_dir("exchanges", "host", host_id);
    let mut filenames = Vec::with_capacity(images.len());
    let mut image_paths = Vec::with_capacity(images.len());
    for (data, extension) in &images {
        let filename = upload::save_image(&host_dir, extension, data).await?;
        image_paths.push(upload::asset_path("exchanges", "host", host_id, &filename));
        filenames.push(filename);
    }

    let inserted: Result<Exchange, sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO exchanges (place_name, title, description, services, benefits, duration, host_id, images)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&place_name)
    .bind(&title)
    .bind(&description)
    .bind(&services)
    .bind(&benefits)
    .bind(&duration)
    .bind(host_id)
    .bind(&image_paths)
    .fetch_one(&state.db_pool)
    .await;

    let exchange = match inserted {
        Ok(exchange) => exchange,
        Err(e) => {
            error!(error = %e, "Failed to insert exchange, cleaning up uploaded files");
            upload::cleanup_files(&host_dir, &filenames).await;
            return Err(e.into());
        }
    };

    info!(
        exchange_id = exchange.id,
        image_count = exchange.images.len(),
        "Exchange created"
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateExchangeResponse {
            bl_ok: true,
            message: "Exchange created successfully",
            exchange,
        }),
    ))
}
