// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use crate::api::validate::{
    required, validate_email_format, validate_password_strength, validate_username_format,
};
use crate::auth::{generate_jwt, password::hash_password};
use crate::database::models::user::{User, USER_COLUMNS};
use crate::error::{is_unique_violation, ApiError};
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

use super::AuthResponse;

const DUPLICATE_USER: &str = "User with this email or username already exists";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

/// POST /api/auth/register - create an account and return a token for it
///
/// ```json
/// { "email": "ada@example.com", "password": "hunter22", "username": "ada" }
/// ```
#[instrument(skip(state, payload), fields(username = payload.username.as_deref().unwrap_or_default()))]
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let (Some(email), Some(password), Some(username)) = (
        required(&payload.email),
        required(&payload.password),
        required(&payload.username),
    ) else {
        return Err(ApiError::bad_request("Email, password, and username are required"));
    };

    validate_email_format(email).map_err(ApiError::bad_request)?;
    validate_username_format(username).map_err(ApiError::bad_request)?;
    validate_password_strength(password).map_err(ApiError::bad_request)?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)")
        .bind(email)
        .bind(username)
        .fetch_one(&state.pool)
        .await?;

    if exists {
        return Err(ApiError::conflict(DUPLICATE_USER));
    }

    let password_hash = hash_password(password)?;

    let query = format!(
        "INSERT INTO users (email, username, password) VALUES ($1, $2, $3) RETURNING {}",
        USER_COLUMNS
    );

    // The unique constraints still decide if a concurrent registration slipped past the check
    let user = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict(DUPLICATE_USER)
            } else {
                e.into()
            }
        })?;

    let token = generate_jwt(&user)?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok(ApiResponse::created(AuthResponse { user, token }).message("User registered successfully"))
}
