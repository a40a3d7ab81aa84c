mod config;
mod db;
mod error;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::store::{AuthStore, MemoryAuthStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let store: Arc<dyn AuthStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            Arc::new(db::PgAuthStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts live in memory and vanish on restart");
            Arc::new(MemoryAuthStore::new())
        }
    };

    let cors = routes::cors_layer(&config.cors_allow_origin).expect("invalid CORS origin");
    let state = state::AppState::new(store, &config);
    let app = routes::app(state, cors);

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, origin = %config.cors_allow_origin, "auth server listening");
    axum::serve(listener, app).await.expect("server failed");
}
