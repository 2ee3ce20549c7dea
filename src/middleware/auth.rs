use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use sqlx::PgPool;

use crate::auth::validate_jwt;
use crate::database::models::user::{User, USER_COLUMNS};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller. Rejects the request with 401 when the bearer token is
/// missing, invalid, expired, or names a user that no longer exists.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Caller if a valid bearer token was supplied, `None` otherwise. Never rejects.
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<User>);

impl MaybeAuthUser {
    pub fn id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.pool).await.map(AuthUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(axum::http::header::AUTHORIZATION) {
            return Ok(MaybeAuthUser(None));
        }
        Ok(MaybeAuthUser(authenticate(&parts.headers, &state.pool).await.ok()))
    }
}

/// Token → claims → user row. Any failure is reported as 401.
pub async fn authenticate(headers: &HeaderMap, pool: &PgPool) -> Result<User, ApiError> {
    let token = extract_jwt_from_headers(headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Unauthorized")
    })?;

    let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(claims.id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error loading user {}: {}", claims.id, e);
            ApiError::unauthorized("Unauthorized")
        })?;

    user.ok_or_else(|| {
        tracing::warn!("Token references missing user {}", claims.id);
        ApiError::unauthorized("Unauthorized")
    })
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Unauthorized".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty bearer token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}
