// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/logout
///
/// No server-side session exists; the client drops its token.
pub async fn logout_post() -> ApiResult<()> {
    Ok(ApiResponse::message_only("Logout successful"))
}
