//! # Health Check Handler
//!
//! Simple endpoint for monitoring application availability, usable by load
//! balancers and deployment tooling.

use axum::http::StatusCode;
use tracing::{debug, instrument};

/// Health check endpoint that returns 200 OK.
///
/// Indicates the application is running and able to respond to HTTP
/// requests. Performs no database checks.
#[instrument]
pub async fn health_check() -> StatusCode {
    debug!("Health check endpoint accessed");
    StatusCode::OK
}
