mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing::{info, warn};

use crate::services::auth::JwtVerifier;
use crate::services::store::PgStore;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    let config = config::Config::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");
    let state = state::AppState::new(
        Arc::new(PgStore::new(pool)),
        JwtVerifier::new(&config.jwt_secret),
        config.outbound_capacity,
    );

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    info!(port = config.port, "inkroom listening");
    axum::serve(listener, app).await.expect("server failed");
}
