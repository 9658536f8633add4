//! # Exchange Listing Model

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// An exchange listing published by a host. Holds at most 10 image paths,
/// enforced both here and by a database check constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Exchange {
    #[serde(rename = "idinterc")]
    pub id: i64,
    #[serde(rename = "nmlocal")]
    pub place_name: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "servicos")]
    pub services: String,
    #[serde(rename = "beneficios")]
    pub benefits: String,
    #[serde(rename = "duracao")]
    pub duration: String,
    #[serde(rename = "idhost")]
    pub host_id: i64,
    #[serde(rename = "imagens")]
    pub images: Vec<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
