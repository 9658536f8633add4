//! # Match Workflow
//!
//! Creating a match links a traveler to an exchange listing and seeds the
//! two placeholder ratings the participants later fill in. All three inserts
//! run inside one transaction so a mid-sequence failure leaves no partial
//! state behind.

use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::error::{AppError, AppResult};
use crate::models::MatchRecord;

/// Creates a match between `traveler_id` and the listing `exchange_id`.
///
/// Verifies that the traveler exists and that the listing exists and resolves
/// to its owning host's user account. On success exactly three rows are
/// inserted: the match plus one placeholder rating in each direction
/// (score 0, empty description, not finalized).
///
/// # Errors
///
/// - [`AppError::NotFound`] when the traveler, the listing, or the listing's
///   host account is missing; nothing is inserted in that case.
/// - [`AppError::Db`] on database failure; the transaction rolls back.
#[instrument(skip(pool))]
pub async fn create_match(
    pool: &PgPool,
    traveler_id: i64,
    exchange_id: i64,
) -> AppResult<MatchRecord> {
    let mut tx = pool.begin().await?;

    let traveler: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(traveler_id)
        .fetch_optional(&mut *tx)
        .await?;
    if traveler.is_none() {
        return Err(AppError::NotFound("Traveler not found"));
    }

    let host_contact_id: Option<i64> =
        sqlx::query_scalar("SELECT host_id FROM exchanges WHERE id = $1")
            .bind(exchange_id)
            .fetch_optional(&mut *tx)
            .await?;
    let Some(host_contact_id) = host_contact_id else {
        return Err(AppError::NotFound("Exchange not found"));
    };

    let host_user_id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE host_id = $1")
        .bind(host_contact_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(host_user_id) = host_user_id else {
        return Err(AppError::NotFound("Exchange host not found"));
    };

    let match_record: MatchRecord = sqlx::query_as(
        "INSERT INTO matches (traveler_id, exchange_id) VALUES ($1, $2) RETURNING *",
    )
    .bind(traveler_id)
    .bind(exchange_id)
    .fetch_one(&mut *tx)
    .await?;

    // One placeholder per direction; column defaults supply score 0,
    // empty description, finalized = false.
    for (subject_id, author_id) in [(host_user_id, traveler_id), (traveler_id, host_user_id)] {
        sqlx::query("INSERT INTO ratings (subject_id, author_id) VALUES ($1, $2)")
            .bind(subject_id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    debug!(
        match_id = match_record.id,
        host_user_id, "Match and placeholder ratings created"
    );
    Ok(match_record)
}
