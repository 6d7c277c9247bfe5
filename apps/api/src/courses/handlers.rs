//! Axum route handlers for courses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::course::CourseRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub content: String,
    pub category: String,
}

impl CreateCourseRequest {
    fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("description", &self.description),
            ("content", &self.content),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// GET /api/courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseRow>>, AppError> {
    let courses = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses ORDER BY created_at, title")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(courses))
}

/// A malformed id cannot name a course, so it reads as not found.
fn parse_course_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("Course {raw} not found")))
}

/// GET /api/courses/:id
pub async fn handle_get_course(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<CourseRow>, AppError> {
    let id = parse_course_id(&raw_id)?;
    let course = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Course {id} not found")))?;
    Ok(Json(course))
}

/// POST /api/courses (admin only)
pub async fn handle_create_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseRow>), AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden);
    }
    req.validate()?;

    let now = Utc::now();
    let course = sqlx::query_as::<_, CourseRow>(
        r#"
        INSERT INTO courses (id, title, description, content, category, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(&req.content)
    .bind(req.category.trim())
    .bind(now)
    .fetch_one(&state.db)
    .await?;

    info!("User {} created course {}", user.id, course.id);
    Ok((StatusCode::CREATED, Json(course)))
}
