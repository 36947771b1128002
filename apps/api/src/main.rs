mod config;
mod db;
mod dialogue;
mod errors;
mod llm_client;
mod models;
mod page_context;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::dialogue::engine::ChatEngine;
use crate::dialogue::matchers::KeywordMatcher;
use crate::dialogue::responders::{HelpResponder, NormalChatResponder};
use crate::dialogue::setup::SetupController;
use crate::llm_client::LlmClient;
use crate::page_context::RedisPageContextStore;
use crate::routes::build_router;
use crate::sessions::{PgSessionStore, SessionLocks};
use crate::state::AppState;

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

    info!("Starting Coach API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    ensure_schema(&db).await?;

    // Initialize Redis
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let engine = ChatEngine::new(
        SetupController::new(Arc::new(KeywordMatcher), config.setup_flow),
        Arc::new(HelpResponder::new(llm.clone())),
        Arc::new(NormalChatResponder::new(llm)),
    );
    info!(
        "Setup flow: MCQ asks for focus areas = {}",
        config.setup_flow.mcq_asks_job_description
    );

    // Build app state
    let state = AppState {
        sessions: Arc::new(PgSessionStore::new(db)),
        session_locks: SessionLocks::new(),
        page_contexts: Arc::new(RedisPageContextStore::new(
            redis,
            config.page_context_ttl_secs,
        )),
        engine,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the extension and web app

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
