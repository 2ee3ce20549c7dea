// handlers/mod.rs - 2-Tier Handler Architecture
//
// Public (no auth) → Protected (bearer JWT, enforced per handler by extractors)
//
// Routes that mix tiers on one path (GET /api/posts/:id is public, PUT/DELETE
// are owner-only) keep every method in the protected module. The handler's
// extractor decides: `AuthUser` rejects with 401, `MaybeAuthUser` never does.
pub mod public;    // Tier 1: /api/auth/*, /api/test, /health
pub mod protected; // Tier 2: /api/posts/*, /api/users/*, /api/notifications/*
