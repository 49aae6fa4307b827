use std::sync::Arc;

use tripboard_db::stores::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tripboard_db::DbPool,
    /// Server configuration (JWT secrets, invite lifetime).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Store handle for the access, ordering and place resolvers.
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }
}
