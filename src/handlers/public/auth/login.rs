// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use crate::api::validate::{required, validate_email_format};
use crate::auth::{generate_jwt, password::verify_password};
use crate::database::models::user::{User, USER_COLUMNS};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

use super::AuthResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// POST /api/auth/login - exchange email + password for a token
///
/// Unknown email, missing password hash and wrong password all produce the
/// same 401 so the response does not reveal which accounts exist.
#[instrument(skip(state, payload))]
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let (Some(email), Some(password)) = (required(&payload.email), required(&payload.password)) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    validate_email_format(email).map_err(ApiError::bad_request)?;

    let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login failed: unknown email");
            invalid_credentials()
        })?;

    let Some(stored_hash) = user.password.as_deref() else {
        tracing::warn!("Login failed: user {} has no password set", user.id);
        return Err(invalid_credentials());
    };

    let is_valid = verify_password(password, stored_hash).unwrap_or_else(|e| {
        tracing::error!("Stored password hash for {} is unusable: {}", user.id, e);
        false
    });

    if !is_valid {
        tracing::warn!("Login failed: bad password for {}", user.id);
        return Err(invalid_credentials());
    }

    let token = generate_jwt(&user)?;

    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(AuthResponse { user, token }).message("Login successful"))
}
