//! # Rating Rules
//!
//! The rating-average business rule applied everywhere an average is
//! surfaced: listing detail, the user rating list, and the map view.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::Rating;
use crate::utils::constant::{MAX_RATING_SCORE, MIN_RATING_SCORE};

/// Arithmetic mean over the finalized ratings in `ratings`.
///
/// Placeholder rows (`finalized` false) are excluded; with no finalized
/// ratings the average is defined as exactly `0.0`, never NaN.
pub fn finalized_average(ratings: &[Rating]) -> f64 {
    let scores: Vec<i32> = ratings
        .iter()
        .filter(|r| r.finalized)
        .map(|r| r.score)
        .collect();

    if scores.is_empty() {
        return 0.0;
    }

    f64::from(scores.iter().sum::<i32>()) / scores.len() as f64
}

/// Formats an average for the map view: one decimal place, as a string.
pub fn display_average(average: f64) -> String {
    format!("{average:.1}")
}

/// Checks a submitted score against the accepted 0..=5 range.
pub fn validate_score(score: i32) -> AppResult<()> {
    if !(MIN_RATING_SCORE..=MAX_RATING_SCORE).contains(&score) {
        return Err(AppError::BadRequest("Score must be between 0 and 5"));
    }
    Ok(())
}

#[derive(FromRow)]
struct HostRatingRow {
    host_id: i64,
    #[sqlx(flatten)]
    rating: Rating,
}

/// Fetches the ratings received by the user account behind each of the given
/// host contacts, grouped by host id.
///
/// Listing views surface a host's average; the subject of those ratings is
/// the host's *user* row, so this resolves the indirection in one query.
pub async fn ratings_by_host(
    pool: &PgPool,
    host_ids: &[i64],
) -> Result<HashMap<i64, Vec<Rating>>, sqlx::Error> {
    if host_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<HostRatingRow> = sqlx::query_as(
        r#"
        SELECT u.host_id AS host_id, r.*
        FROM ratings r
        JOIN users u ON u.id = r.subject_id
        WHERE u.host_id = ANY($1)
        "#,
    )
    .bind(host_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<i64, Vec<Rating>> = HashMap::new();
    for row in rows {
        grouped.entry(row.host_id).or_default().push(row.rating);
    }
    Ok(grouped)
}
