//! # Password Service
//!
//! Thin wrappers around bcrypt so the work factor is configured in one
//! place. Hashing runs on a blocking thread since bcrypt is CPU-bound.

use bcrypt::BcryptError;

use crate::utils::static_object::BCRYPT_COST;

/// Hashes a plaintext password with the configured bcrypt cost.
pub async fn hash(plain: &str) -> Result<String, BcryptError> {
    let plain = plain.to_owned();
    let cost = *BCRYPT_COST;

    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .map_err(|e| BcryptError::Io(std::io::Error::other(e)))?
}

/// Verifies a plaintext password against a stored bcrypt hash.
pub async fn verify(plain: &str, hashed: &str) -> Result<bool, BcryptError> {
    let plain = plain.to_owned();
    let hashed = hashed.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(plain, hashed.as_str()))
        .await
        .map_err(|e| BcryptError::Io(std::io::Error::other(e)))?
}
