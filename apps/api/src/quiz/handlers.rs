//! Axum route handlers for quizzes and quiz results.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::quiz::QuizResultRow;
use crate::quiz::generator::{generate_quiz, grade, QuizOrigin, QuizQuestion};
use crate::quiz::progress::{progress_report, ProgressReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub quiz: Vec<QuizQuestion>,
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub score: u32,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultRequest {
    pub course_title: String,
    pub score: i32,
    pub total_questions: i32,
}

impl SaveResultRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.course_title.trim().is_empty() {
            return Err(AppError::Validation("courseTitle is required".to_string()));
        }
        if self.total_questions <= 0 {
            return Err(AppError::Validation(
                "totalQuestions must be positive".to_string(),
            ));
        }
        if self.score < 0 || self.score > self.total_questions {
            return Err(AppError::Validation(
                "score must be between 0 and totalQuestions".to_string(),
            ));
        }
        Ok(())
    }
}

/// POST /api/ai/generate-quiz
///
/// Responds with the bare question array; `x-quiz-origin` tells whether the
/// questions came from the model or the built-in fallback.
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<([(&'static str, &'static str); 1], Json<Vec<QuizQuestion>>), AppError> {
    if req.content.trim().is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let quiz = generate_quiz(state.llm.as_ref(), &req.content).await;
    let origin = match quiz.origin {
        QuizOrigin::Generated => "generated",
        QuizOrigin::Fallback => "fallback",
    };
    info!(
        "Quiz for user {}: {} questions ({origin})",
        user.id,
        quiz.questions.len()
    );

    Ok(([("x-quiz-origin", origin)], Json(quiz.questions)))
}

/// POST /api/quizzes/grade
pub async fn handle_grade_quiz(
    _user: AuthUser,
    Json(req): Json<GradeRequest>,
) -> Result<Json<GradeResponse>, AppError> {
    if req.quiz.is_empty() {
        return Err(AppError::Validation("quiz has no questions".to_string()));
    }
    if req.answers.len() != req.quiz.len() {
        return Err(AppError::Validation(format!(
            "expected {} answers, got {}",
            req.quiz.len(),
            req.answers.len()
        )));
    }

    Ok(Json(GradeResponse {
        score: grade(&req.quiz, &req.answers),
        total: req.quiz.len(),
    }))
}

/// POST /api/quizzes/result
pub async fn handle_save_result(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<SaveResultRequest>,
) -> Result<(StatusCode, Json<QuizResultRow>), AppError> {
    req.validate()?;

    let saved = sqlx::query_as::<_, QuizResultRow>(
        r#"
        INSERT INTO quiz_results (id, user_id, course_title, score, total_questions, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(req.course_title.trim())
    .bind(req.score)
    .bind(req.total_questions)
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

async fn results_for(state: &AppState, user_id: Uuid) -> Result<Vec<QuizResultRow>, AppError> {
    Ok(sqlx::query_as::<_, QuizResultRow>(
        "SELECT * FROM quiz_results WHERE user_id = $1 ORDER BY date ASC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?)
}

/// GET /api/quizzes/my-results
pub async fn handle_my_results(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<QuizResultRow>>, AppError> {
    Ok(Json(results_for(&state, user.id).await?))
}

/// GET /api/quizzes/progress
pub async fn handle_progress(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProgressReport>, AppError> {
    let results = results_for(&state, user.id).await?;
    Ok(Json(progress_report(&results)))
}
