use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::games::sudoku::engine::PuzzleSource;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Gemini in production; a stub in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub puzzles: Arc<dyn PuzzleSource>,
    pub config: Config,
}
