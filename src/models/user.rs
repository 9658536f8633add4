//! # User Model
//!
//! Row type and database enums for user accounts. The serde renames on
//! [`User`] produce the field names the frontend consumes; the password hash
//! and reset-code columns are never serialized.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Status flag shared by user and host contact rows.
///
/// Serialized as the single-letter flag the public API exposes
/// (`A` active, `I` inactive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
pub enum AccountStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "I")]
    Inactive,
}

/// Whether an account is a plain traveler or a promoted host.
///
/// A user row may only carry `Host` together with a host contact reference;
/// promotion sets both inside one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_kind", rename_all = "lowercase")]
pub enum UserKind {
    #[serde(rename = "V")]
    Traveler,
    #[serde(rename = "H")]
    Host,
}

impl UserKind {
    #[inline]
    pub fn is_host(self) -> bool {
        matches!(self, UserKind::Host)
    }
}

/// A registered account, traveler or host.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    #[serde(rename = "idusuario")]
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub cpf: Option<String>,
    pub rg: Option<String>,
    #[serde(rename = "nrpassa")]
    pub passport: Option<String>,
    #[serde(rename = "sexo")]
    pub gender: Option<String>,
    #[serde(rename = "nacionalidade")]
    pub nationality: Option<String>,
    #[serde(rename = "stusuario")]
    pub status: AccountStatus,
    #[serde(rename = "tpusuario")]
    pub kind: UserKind,
    #[serde(rename = "idhost")]
    pub host_id: Option<i64>,
    #[serde(skip)]
    pub reset_code: Option<String>,
    #[serde(skip)]
    pub reset_code_expires_at: Option<OffsetDateTime>,
    #[serde(rename = "fotoPerfil")]
    pub profile_photo_path: Option<String>,
    #[serde(rename = "fotoCapa")]
    pub cover_photo_path: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
