mod admin;
mod ai;
mod auth;
mod config;
mod db;
mod editor;
mod errors;
mod export;
mod models;
mod render;
mod resumes;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::client::AiClient;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::render::catalog::builtin_templates;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;
    let store: Arc<dyn Store> = Arc::new(PgStore::new(db));

    let seeded = store.seed_templates(builtin_templates()).await?;
    info!("Template catalog ready ({seeded} newly seeded)");

    if let Some(admin) = &config.bootstrap_admin {
        auth::bootstrap_admin(store.as_ref(), admin).await?;
    }
    if let Some(key) = &config.openrouter_api_key {
        ai::seed_api_key(store.as_ref(), key).await?;
    }

    // Initialize AI client
    let ai = AiClient::new(&config)?;
    info!("AI client initialized (model: {})", config.openrouter_model);

    let state = AppState {
        store,
        ai,
        config: config.clone(),
    };

    // TODO: restrict origins to APP_URL once the UI is served from it
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
