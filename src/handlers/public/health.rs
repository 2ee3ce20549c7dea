// handlers/public/health.rs - Liveness and readiness checks

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: String,
}

/// GET / - service banner and route index
pub async fn root_get() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "SocialConnect API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Posts, likes, comments, follows and realtime notifications",
            "endpoints": {
                "health": "/health, /api/test (public)",
                "auth": "/api/auth/register, /api/auth/login, /api/auth/logout (public)",
                "posts": "/api/posts/create, /api/posts/feed, /api/posts/:id[/like|/comment|/comments]",
                "users": "/api/users/profile, /api/users/follow, /api/users/:id",
                "notifications": "/api/notifications[/:id|/unread-count|/realtime] (protected)",
            }
        }
    }))
}

/// GET /api/test - process is up and routing requests
pub async fn api_test_get() -> ApiResult<ServiceStatus> {
    Ok(ApiResponse::success(ServiceStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
    .message("SocialConnect API is running!"))
}

/// GET /health - database round trip
pub async fn health_get(State(state): State<AppState>) -> Response {
    let timestamp = Utc::now().to_rfc3339();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "healthy",
                    "database": "ok",
                    "timestamp": timestamp
                }
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "database": "unavailable",
                        "timestamp": timestamp
                    }
                })),
            )
                .into_response()
        }
    }
}
