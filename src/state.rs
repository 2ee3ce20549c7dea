use sqlx::PgPool;

use crate::realtime::NotificationHub;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub hub: NotificationHub,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hub: NotificationHub::new(),
        }
    }
}
