pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod realtime;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::state::AppState;

/// Full application router: `/`, `/health` and everything under `/api`
pub fn build_router(state: AppState) -> Router {
    let config = config::config();

    let api = Router::new()
        .route("/test", get(handlers::public::api_test_get))
        .merge(auth_routes())
        .merge(post_routes())
        .merge(user_routes())
        .merge(notification_routes());

    let mut app = Router::new()
        // Public
        .route("/", get(handlers::public::root_get))
        .route("/health", get(handlers::public::health_get))
        .nest("/api", api)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security));

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        .route("/auth/logout", post(auth::logout_post))
}

fn post_routes() -> Router<AppState> {
    use handlers::protected::posts;

    Router::new()
        // Collection
        .route("/posts/create", post(posts::post_create))
        .route("/posts/feed", get(posts::feed_get))
        // Record (GET is public, PUT/DELETE owner only)
        .route(
            "/posts/:id",
            get(posts::record_get)
                .put(posts::record_put)
                .delete(posts::record_delete),
        )
        // Reactions
        .route("/posts/:id/like", post(posts::like_post).delete(posts::like_delete))
        .route("/posts/:id/comment", post(posts::comment_post))
        .route("/posts/:id/comments", get(posts::comments_get))
}

fn user_routes() -> Router<AppState> {
    use handlers::protected::users;

    Router::new()
        .route("/users/profile", get(users::profile_get).put(users::profile_put))
        .route("/users/follow", post(users::follow_post).delete(users::follow_delete))
        .route("/users/:id", get(users::user_get))
}

fn notification_routes() -> Router<AppState> {
    use handlers::protected::notifications;

    Router::new()
        .route(
            "/notifications",
            get(notifications::list_get).patch(notifications::read_all_patch),
        )
        .route("/notifications/unread-count", get(notifications::unread_count_get))
        .route("/notifications/realtime", get(notifications::realtime_get))
        .route("/notifications/:id", put(notifications::read_put))
}

/// Permissive when no origins are configured (or `*` is listed), otherwise an allow-list.
/// With CORS disabled no CORS headers are sent at all.
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security(enable_cors: bool, origins: &[&str]) -> SecurityConfig {
        SecurityConfig {
            enable_cors,
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_hours: 1,
        }
    }

    #[test]
    fn cors_layer_builds_for_every_mode() {
        let _ = cors_layer(&security(false, &[]));
        let _ = cors_layer(&security(true, &[]));
        let _ = cors_layer(&security(true, &["*"]));
        let _ = cors_layer(&security(true, &["https://app.example.com", "not a header\n"]));
    }
}
