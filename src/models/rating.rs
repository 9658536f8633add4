//! # Rating Model

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// A rating of one user by another.
///
/// Rows start as placeholders (score 0, `finalized` false) created at match
/// time; the score only becomes meaningful once a participant submits it and
/// `finalized` flips to true.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    #[serde(rename = "idavaliacao")]
    pub id: i64,
    #[serde(rename = "avaliadoId")]
    pub subject_id: i64,
    #[serde(rename = "avaliadorId")]
    pub author_id: i64,
    #[serde(rename = "avaliacao")]
    pub score: i32,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "snaval")]
    pub finalized: bool,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
