//! # Match Model
//!
//! The link between a traveler and an exchange listing. Created together
//! with two placeholder ratings inside one transaction.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchRecord {
    #[serde(rename = "idmatch")]
    pub id: i64,
    #[serde(rename = "idviajante")]
    pub traveler_id: i64,
    #[serde(rename = "idinterc")]
    pub exchange_id: i64,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
