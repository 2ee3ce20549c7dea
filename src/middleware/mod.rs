pub mod auth;
pub mod json;
pub mod response;

pub use auth::{AuthUser, MaybeAuthUser};
pub use json::ApiJson;
pub use response::{ApiResponse, ApiResult};
