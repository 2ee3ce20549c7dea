use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use crate::api::validate::{normalize_optional, validate_bio, validate_username_format};
use crate::database::models::user::{User, USER_COLUMNS};
use crate::database::models::UserProfile;
use crate::error::{is_unique_violation, ApiError};
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::follow_stats;

const USERNAME_TAKEN: &str = "Username already taken";

/// Absent fields are left untouched. An empty `bio`/`avatar_url` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// An empty username counts as not supplied; anything else must pass the
/// registration rules as sent.
fn requested_username(username: Option<&str>) -> Result<Option<&str>, String> {
    match username {
        None | Some("") => Ok(None),
        Some(username) => validate_username_format(username).map(|_| Some(username)),
    }
}

/// GET /api/users/profile
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get(State(state): State<AppState>, AuthUser(user): AuthUser) -> ApiResult<UserProfile> {
    let stats = follow_stats(&state.pool, user.id, None).await?;

    let profile = UserProfile {
        user,
        followers_count: stats.followers_count,
        following_count: stats.following_count,
        is_following: None,
    };

    Ok(ApiResponse::success(profile).message("Profile retrieved successfully"))
}

/// PUT /api/users/profile
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn put(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> ApiResult<User> {
    let username = requested_username(body.username.as_deref()).map_err(ApiError::bad_request)?;

    if let Some(bio) = body.bio.as_deref() {
        validate_bio(bio.trim()).map_err(ApiError::bad_request)?;
    }

    if let Some(username) = username.filter(|u| *u != user.username) {
        let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id <> $2)")
            .bind(username)
            .bind(user.id)
            .fetch_one(&state.pool)
            .await?;

        if taken {
            return Err(ApiError::conflict(USERNAME_TAKEN));
        }
    }

    let set_bio = body.bio.is_some();
    let set_avatar = body.avatar_url.is_some();

    let query = format!(
        "UPDATE users SET \
            username = COALESCE($2, username), \
            bio = CASE WHEN $3 THEN $4 ELSE bio END, \
            avatar_url = CASE WHEN $5 THEN $6 ELSE avatar_url END, \
            updated_at = now() \
         WHERE id = $1 RETURNING {}",
        USER_COLUMNS
    );

    let updated = sqlx::query_as::<_, User>(&query)
        .bind(user.id)
        .bind(username)
        .bind(set_bio)
        .bind(normalize_optional(body.bio))
        .bind(set_avatar)
        .bind(normalize_optional(body.avatar_url))
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict(USERNAME_TAKEN)
            } else {
                e.into()
            }
        })?;

    tracing::info!("Updated profile for {}", updated.id);

    Ok(ApiResponse::success(updated).message("Profile updated successfully"))
}
