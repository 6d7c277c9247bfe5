pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::career::handlers as career;
use crate::courses::handlers as courses;
use crate::games::chess::handlers as chess;
use crate::games::sudoku::handlers as sudoku;
use crate::quiz::handlers as quiz;
use crate::state::AppState;
use crate::tutor::handlers as tutor;

/// Headroom for multipart boundaries and the job description field.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/users", post(auth::handle_register))
        .route("/api/users/login", post(auth::handle_login))
        .route("/api/users/profile", get(auth::handle_profile))
        // Courses
        .route(
            "/api/courses",
            get(courses::handle_list_courses).post(courses::handle_create_course),
        )
        .route("/api/courses/:id", get(courses::handle_get_course))
        // Quizzes and progress
        .route("/api/ai/generate-quiz", post(quiz::handle_generate_quiz))
        .route("/api/quizzes/grade", post(quiz::handle_grade_quiz))
        .route("/api/quizzes/result", post(quiz::handle_save_result))
        .route("/api/quizzes/my-results", get(quiz::handle_my_results))
        .route("/api/quizzes/progress", get(quiz::handle_progress))
        // Tutor
        .route("/api/ai/chat", post(tutor::handle_chat))
        // Job hub
        .route(
            "/api/ai/analyze-resume",
            post(career::handle_analyze_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/ai/analyze-resume/text",
            post(career::handle_analyze_text),
        )
        // Games
        .route("/api/games/sudoku/new", get(sudoku::handle_new_game))
        .route("/api/games/sudoku/move", post(sudoku::handle_move))
        .route("/api/games/chess/new", get(chess::handle_new_chess_game))
        .route("/api/games/chess/move", post(chess::handle_chess_move))
        .with_state(state)
}
