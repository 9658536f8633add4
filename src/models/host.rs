//! # Host Contact Model
//!
//! The property/contact record created when a user is promoted to host.

use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::models::AccountStatus;

/// A host's property and contact record.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Host {
    #[serde(rename = "idctt")]
    pub id: i64,
    #[serde(rename = "nmprop")]
    pub property_name: String,
    #[serde(rename = "endereco")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "complem")]
    pub complement: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "cdestado")]
    pub state: String,
    #[serde(rename = "nrcep")]
    pub postal_code: String,
    #[serde(rename = "nrtel")]
    pub phone: String,
    #[serde(rename = "tipoProp")]
    pub property_kind: String,
    pub email: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "stcadast")]
    pub status: AccountStatus,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
