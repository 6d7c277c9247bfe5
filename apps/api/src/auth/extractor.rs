use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::debug;

use crate::auth::{token::verify_token, users::find_by_id};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// The authenticated caller, loaded from the `Authorization: Bearer` token.
pub struct AuthUser(pub UserRow);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".to_string()))?;

        let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
            debug!("Rejected bearer token: {e}");
            AppError::Unauthorized("Not authorized, token failed".to_string())
        })?;

        let user = find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

        Ok(AuthUser(user))
    }
}
