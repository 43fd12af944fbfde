//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use securenet_core::config::AppConfig;
use securenet_database::PersistentStore;
use securenet_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Real-time hub engine
    pub engine: Arc<RealtimeEngine>,
    /// Persistent store (health checks)
    pub store: PersistentStore,
    /// Process start time
    pub started_at: Instant,
}

impl AppState {
    /// Builds state for a freshly started process.
    pub fn new(config: Arc<AppConfig>, engine: Arc<RealtimeEngine>, store: PersistentStore) -> Self {
        Self {
            config,
            engine,
            store,
            started_at: Instant::now(),
        }
    }
}
