// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required, except the few read endpoints
// that take `MaybeAuthUser` and personalise their output when a token is sent
// Route Prefix: /api/posts/*, /api/users/*, /api/notifications/*
// Middleware: none at the router level; see middleware::auth extractors

pub mod notifications; // Inbox, read state, realtime stream
pub mod posts;         // Posts, likes and comments
pub mod users;         // Profiles and follows
pub mod utils;
