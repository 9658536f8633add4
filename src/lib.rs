//! # hostXchange - Traveler/Host Marketplace Backend
//!
//! ## Modules
//!
//! - [`handlers`] - HTTP request handlers for various endpoints
//! - [`models`] - Database row types and shared application state
//! - [`services`] - Business logic services (email, passwords, ratings, matching)
//! - [`utils`] - Utility functions and constants

pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::env;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use sqlx::PgPool;
use tower_http::services::ServeDir;
use tracing::info;

use crate::handlers::{
    become_host, create_exchange, create_match, create_rating, get_exchange, get_profile,
    health_check, list_exchanges, list_map, list_ratings, login, register_user, send_reset_code,
    update_password, update_profile, update_rating, validate_reset_code,
};
use crate::models::AppState;
use crate::services::email::{EmailService, ExternalEmailer, LogEmailer};
use crate::utils::constant::*;
use crate::utils::static_object::UPLOAD_DIR;

/// Maximum accepted request body: up to 10 listing images at 5 MB each,
/// plus form fields.
const MAX_BODY_BYTES: usize = 52 * 1024 * 1024;

/// Creates an Axum router with default email service configuration.
///
/// This is a convenience function that calls [`app_with_email_service`] with no custom
/// email service, causing it to auto-detect the appropriate service based on the
/// `APP_ENV` environment variable.
#[inline]
pub fn app(db_pool: PgPool) -> Router {
    app_with_email_service(db_pool, None)
}

/// Creates an Axum router with application routes and state.
///
/// # Arguments
///
/// * `db_pool` - PostgreSQL database connection pool
/// * `email_service` - Optional custom email service. If None, will auto-detect based on APP_ENV
///
/// # Environment Variables
///
/// - `APP_ENV` - "production" uses ExternalEmailer, otherwise uses LogEmailer (mock)
/// - `MAIL_API_URL` - Required in production for external email service
/// - `MAIL_API_KEY` - Required in production for external email service
/// - `SENDER_EMAIL` - Required in production for external email service
/// - `UPLOAD_DIR` - Root directory for uploaded files (served under `/assets`)
pub fn app_with_email_service(
    db_pool: PgPool,
    email_service: Option<Arc<dyn EmailService>>,
) -> Router {
    let email_service: Arc<dyn EmailService> = if let Some(service) = email_service {
        service
    } else {
        let app_env = env::var("APP_ENV")
            .expect("Env variable `APP_ENV` should be set")
            .to_ascii_lowercase();

        if app_env == "production" {
            info!("Running in production mode with [ExternalEmailer]");
            let api_url =
                env::var("MAIL_API_URL").expect("Env variable `MAIL_API_URL` should be set");
            let api_key =
                env::var("MAIL_API_KEY").expect("Env variable `MAIL_API_KEY` should be set");
            let sender =
                env::var("SENDER_EMAIL").expect("Env variable `SENDER_EMAIL` should be set");
            Arc::new(ExternalEmailer::new(api_url, api_key, sender))
        } else {
            info!("Running in development mode with [LogEmailer (Mock)]");
            Arc::new(LogEmailer)
        }
    };

    let state = Arc::new(AppState::new(email_service, db_pool));

    let state_clone = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
        interval.tick().await; // first tick completes immediately
        loop {
            interval.tick().await;
            state_clone.cleanup_expired_entries();
        }
    });

    let registration_routes = Router::new()
        .route("/cadastro/cadastroUsuario", post(register_user))
        .route("/cadastro/tornaHost", post(become_host));

    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/login/enviaCodigo", post(send_reset_code))
        .route("/login/validaCodigo", post(validate_reset_code))
        .route("/login/atualizaSenha", post(update_password));

    let exchange_routes = Router::new()
        .route("/intercambios/buscar", get(list_exchanges))
        .route("/intercambios/cadastrar", post(create_exchange))
        .route("/intercambios/buscarId", post(get_exchange));

    let rating_routes = Router::new()
        .route("/avaliacao/criaAvaliacao", post(create_rating))
        .route("/avaliacao/listaAvaliacoes", post(list_ratings))
        .route("/avaliacao/atualizaAvaliacao", post(update_rating));

    let profile_routes = Router::new()
        .route("/perfil/listaPerfil", post(get_profile))
        .route("/perfil/atualizarPerfil", post(update_profile));

    Router::new()
        .route("/health-check", get(health_check))
        .merge(registration_routes)
        .merge(auth_routes)
        .merge(exchange_routes)
        .route("/match/criarMatch", post(create_match))
        .merge(rating_routes)
        .route("/mapa/listar", post(list_map))
        .merge(profile_routes)
        .nest_service("/assets", ServeDir::new(UPLOAD_DIR.as_str()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
