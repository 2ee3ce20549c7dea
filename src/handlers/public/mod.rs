// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None (completely public access)
// Routes: /api/auth/*, /api/test, /health
// Middleware: None. Handlers that personalise their output use the
// `MaybeAuthUser` extractor instead and live with the protected handlers.

pub mod auth;
pub mod health;

pub use auth::*;
pub use health::{api_test_get, health_get, root_get};
