//! # Application Constants
//!
//! Configuration constants controlling timeouts, limits and business rules.

use std::time::Duration;

/// Rate limit duration for password-reset email requests
///
/// Users must wait this duration between reset-code requests to prevent
/// abuse of the email service.
pub const EMAIL_RATE_LIMIT: Duration = Duration::from_secs(3 * 60);

/// Expiration time for password-reset codes
///
/// A stored reset code becomes invalid after this duration.
pub const RESET_CODE_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Maximum number of entries to keep in the rate limit cache
///
/// When the cache exceeds this size, stale entries are cleaned up to
/// prevent unlimited memory growth.
pub const CACHE_CAPACITY: usize = 100;

/// Interval for automatic cache cleanup
pub const CACHE_CLEANUP_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// Maximum number of images attached to a single exchange listing
pub const MAX_EXCHANGE_IMAGES: usize = 10;

/// Inclusive rating score range accepted by the rating-update endpoint
pub const MIN_RATING_SCORE: i32 = 0;
pub const MAX_RATING_SCORE: i32 = 5;
