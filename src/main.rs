use hostxchange::app;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "hostxchange=debug".into()))
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            "hostxchange".into(),
            std::io::stdout,
        ))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").expect("Env variable `DATABASE_URL` should be set");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let listen_addr =
        std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&listen_addr)
        .await
        .expect("Failed to bind listen address");
    info!("Server starting at http://{listen_addr}");

    axum::serve(listener, app(db_pool).into_make_service())
        .await
        .expect("Server error");
}
