//! Axum route handlers for accounts.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::streak::compute_streak_at;
use crate::auth::token::issue_token;
use crate::auth::users::{email_exists, insert_user, normalize_email, NewUser};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::user::{UserProfile, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub streak_count: i32,
    pub token: String,
}

impl AuthResponse {
    fn new(user: &UserRow, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            streak_count: user.streak_count,
            token,
        }
    }
}

fn sign(state: &AppState, user: &UserRow) -> Result<String, AppError> {
    issue_token(user.id, &state.config.jwt_secret, state.config.token_ttl_days)
        .map_err(|e| AppError::Internal(e.into()))
}

/// POST /api/users
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "name, email and password are required".to_string(),
        ));
    }

    if email_exists(&state.db, &email).await? {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let user = insert_user(
        &state.db,
        NewUser {
            name,
            email: &email,
            password_hash: &password_hash,
            now: Utc::now(),
        },
    )
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict("User already exists".to_string());
            }
        }
        AppError::Database(e)
    })?;

    info!("Registered user {}", user.id);

    let token = sign(&state, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse::new(&user, token))))
}

/// POST /api/users/login
///
/// Credential check, streak update and last-login write share one
/// transaction; the row lock serialises concurrent logins for one account.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());
    let email = normalize_email(&req.email);

    let mut tx = state.db.begin().await?;

    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE email = $1 FOR UPDATE")
        .bind(&email)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(invalid)?;

    let password = req.password;
    let stored_hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !verified {
        return Err(invalid());
    }

    let now = Utc::now();
    let streak = compute_streak_at(
        user.last_login_date.map(|d| d.with_timezone(&Local)),
        u32::try_from(user.streak_count).unwrap_or(0),
        now.with_timezone(&Local),
    );
    let streak = i32::try_from(streak).unwrap_or(i32::MAX);

    let user: UserRow = sqlx::query_as(
        r#"
        UPDATE users
        SET streak_count = $1, last_login_date = $2, updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(streak)
    .bind(now)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("User {} logged in, streak {}", user.id, user.streak_count);

    let token = sign(&state, &user)?;
    Ok(Json(AuthResponse::new(&user, token)))
}

/// GET /api/users/profile
pub async fn handle_profile(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}
