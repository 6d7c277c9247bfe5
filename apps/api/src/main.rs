mod auth;
mod career;
mod config;
mod courses;
mod db;
mod errors;
mod games;
mod llm_client;
mod models;
mod quiz;
mod routes;
mod state;
mod tutor;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::courses::seed::import_courses;
use crate::db::create_pool;
use crate::games::sudoku::generator::RandomPuzzleSource;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting LearnPath API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    // `learnpath-api seed` replaces the course catalog and exits.
    if std::env::args().nth(1).as_deref() == Some("seed") {
        let count = import_courses(&db).await?;
        info!("Imported {count} courses");
        return Ok(());
    }

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI features will use fallback responses");
    }
    let llm = GeminiClient::new(config.gemini_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        db,
        llm: Arc::new(llm),
        puzzles: Arc::new(RandomPuzzleSource),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
