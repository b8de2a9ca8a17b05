//! Shared application state for axum handlers.

use crate::config::Settings;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// State handed to every handler and middleware.
///
/// Cloning is cheap: services and the pool are `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct pool access for health probes
    pub db_pool: AsyncDbPool,
}

impl AppState {
    /// Wires repositories and services from a pool and loaded settings.
    ///
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, &settings);
    /// ```
    pub fn new(pool: AsyncDbPool, settings: &Settings) -> Self {
        let repos = Repositories::new(pool.clone());
        Self {
            services: Services::new(repos, settings),
            db_pool: pool,
        }
    }
}
