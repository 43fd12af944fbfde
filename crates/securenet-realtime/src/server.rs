//! Top-level real-time engine that ties together all hub subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use securenet_core::config::RealtimeConfig;
use securenet_core::error::AppError;
use securenet_core::types::id::SessionId;
use securenet_database::PersistentStore;

use crate::connection::manager::ConnectionManager;
use crate::hub::broadcaster::Broadcaster;
use crate::hub::controller::HubController;
use crate::hub::registry::ConnectionRegistry;
use crate::hub::router::CommandRouter;
use crate::metrics::RealtimeMetrics;

/// Central real-time engine that coordinates the hub.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Device name bindings.
    pub registry: Arc<ConnectionRegistry>,
    /// Snapshot broadcaster.
    pub broadcaster: Arc<Broadcaster>,
    /// Command router.
    pub router: Arc<CommandRouter>,
    /// RPC controller.
    pub hub: Arc<HubController>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new engine over `store`.
    pub fn new(config: RealtimeConfig, store: PersistentStore) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let connections = Arc::new(ConnectionManager::new(config.clone(), metrics.clone()));
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(
            store.clone(),
            connections.clone(),
            metrics.clone(),
        ));
        let router = Arc::new(CommandRouter::new(
            registry.clone(),
            connections.clone(),
            metrics.clone(),
        ));
        let hub = Arc::new(HubController::new(
            store,
            registry.clone(),
            broadcaster.clone(),
            router.clone(),
            connections.clone(),
            metrics.clone(),
            config.max_message_bytes,
        ));

        info!("Real-time engine initialized");

        Self {
            connections,
            registry,
            broadcaster,
            router,
            hub,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Tears down a session: drops it from the pool, then runs the hub's
    /// close transition. Store failures are logged; there is no caller to
    /// report them to.
    pub async fn disconnect(&self, session: SessionId) {
        self.connections.close(&session);
        if let Err(e) = self.hub.session_closed(session).await {
            warn!(session_id = %session, error = %e, "Failed to record session close");
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        let _ = self.shutdown_tx.send(());
        self.connections.close_all().await;

        info!("Real-time engine shut down");
        Ok(())
    }
}
