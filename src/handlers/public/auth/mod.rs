// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints that do not require authentication.
// Tokens are stateless, so logout only tells the client to discard its copy.

use serde::Serialize;

use crate::database::models::User;

pub mod login;    // POST /api/auth/login - authenticate and get JWT
pub mod logout;   // POST /api/auth/logout - acknowledge client-side logout
pub mod register; // POST /api/auth/register - create new account

pub use login::login_post;
pub use logout::logout_post;
pub use register::register_post;

/// `data` payload shared by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
