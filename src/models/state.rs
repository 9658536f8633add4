use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use crate::services::email::EmailService;
use crate::utils::constant::*;

/// Application state shared across requests. Needs to be thread-safe.
pub struct AppState {
    /// A map of email addresses to the instant their last reset code was sent.
    pub rate_limit_cache: DashMap<String, Instant>,
    /// The email service used to deliver password-reset codes.
    pub email_service: Arc<dyn EmailService>,
    /// The PostgreSQL database connection pool.
    pub db_pool: PgPool,
}

impl AppState {
    pub fn new(email_service: Arc<dyn EmailService>, db_pool: PgPool) -> Self {
        info!("Initializing application state");

        Self {
            rate_limit_cache: DashMap::new(),
            email_service,
            db_pool,
        }
    }

    /// Cleans up stale entries from the rate limit cache.
    ///
    /// Called periodically from a background task. Only performs cleanup when
    /// the cache size exceeds the configured capacity.
    #[instrument(skip_all)]
    pub fn cleanup_expired_entries(&self) {
        let cache_size = self.rate_limit_cache.len();

        debug!(
            cache_size,
            cache_capacity = CACHE_CAPACITY,
            "Checking if cache cleanup is needed"
        );

        if cache_size > CACHE_CAPACITY {
            self.rate_limit_cache
                .retain(|_, timestamp| timestamp.elapsed() <= EMAIL_RATE_LIMIT);

            info!(
                initial_size = cache_size,
                final_size = self.rate_limit_cache.len(),
                "Cleaned up stale rate limit entries"
            );
        }
    }
}
