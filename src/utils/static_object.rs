use std::env;
use std::sync::LazyLock;

use tracing::error;

/// Root directory for uploaded files. Served back under `/assets`.
pub static UPLOAD_DIR: LazyLock<String> = LazyLock::new(|| {
    env::var("UPLOAD_DIR").unwrap_or_else(|_| {
        error!("Missing UPLOAD_DIR env var, using fallback './uploads'");
        "./uploads".to_string()
    })
});

/// bcrypt work factor used when hashing passwords.
pub static BCRYPT_COST: LazyLock<u32> = LazyLock::new(|| {
    env::var("BCRYPT_COST")
        .ok()
        .and_then(|val| val.parse().ok())
        .unwrap_or_else(|| {
            error!(
                "Invalid or missing BCRYPT_COST env var, using fallback {}",
                bcrypt::DEFAULT_COST
            );
            bcrypt::DEFAULT_COST
        })
});
