//! Connection manager: session lifecycle and outbound delivery.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use securenet_core::config::RealtimeConfig;
use securenet_core::types::id::SessionId;

use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;
use crate::transport::Transport;

use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;

/// Manages all live sessions.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Metrics.
    metrics: Arc<RealtimeMetrics>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig, metrics: Arc<RealtimeMetrics>) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            metrics,
            config,
        }
    }

    /// Opens a new session.
    ///
    /// Returns the session handle and the receiver the socket writer drains.
    pub fn open(
        &self,
        remote_addr: Option<String>,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(SessionId::new(), remote_addr, tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(
            session_id = %handle.id,
            remote_addr = handle.remote_addr.as_deref().unwrap_or("unknown"),
            "Session opened"
        );

        (handle, rx)
    }

    /// Closes a session and removes it from the pool.
    ///
    /// Returns the handle if the session was still open.
    pub fn close(&self, session: &SessionId) -> Option<Arc<ConnectionHandle>> {
        let handle = self.pool.remove(session)?;
        handle.mark_dead();
        self.metrics.connection_closed();
        info!(session_id = %session, "Session closed");
        Some(handle)
    }

    /// Looks up a live session.
    pub fn get(&self, session: &SessionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(session)
    }

    /// Marks every session dead and empties the pool.
    pub async fn close_all(&self) {
        let handles = self.pool.all_connections();
        let count = handles.len();
        for handle in handles {
            self.close(&handle.id);
        }
        info!(count, "All sessions closed");
    }

    /// Number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the pool.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}

#[async_trait]
impl Transport for ConnectionManager {
    async fn send_to(&self, session: SessionId, message: OutboundMessage) -> bool {
        let Some(handle) = self.pool.get(&session) else {
            debug!(session_id = %session, "Unicast target not in pool");
            return false;
        };
        let sent = handle.send(message);
        if sent {
            self.metrics.message_sent_count(1);
        }
        sent
    }

    async fn broadcast(&self, message: OutboundMessage) -> usize {
        let handles = self.pool.all_connections();
        let mut delivered = 0usize;
        for handle in handles.iter().filter(|h| h.is_alive()) {
            if handle.send(message.clone()) {
                delivered += 1;
            }
        }
        self.metrics.message_sent_count(delivered as u64);
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> ConnectionManager {
        ConnectionManager::new(RealtimeConfig::default(), Arc::new(RealtimeMetrics::new()))
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let manager = manager();
        let (handle, _rx) = manager.open(Some("127.0.0.1:9000".to_string()));
        assert_eq!(manager.connection_count(), 1);
        assert!(manager.get(&handle.id).is_some());

        let closed = manager.close(&handle.id).unwrap();
        assert!(!closed.is_alive());
        assert_eq!(manager.connection_count(), 0);
        assert!(manager.close(&handle.id).is_none());
    }

    #[tokio::test]
    async fn test_send_to_targets_one_session() {
        let manager = manager();
        let (a, mut rx_a) = manager.open(None);
        let (_b, mut rx_b) = manager.open(None);

        let msg = OutboundMessage::Ping { timestamp: 1 };
        assert!(manager.send_to(a.id, msg.clone()).await);
        assert_eq!(rx_a.recv().await, Some(msg));
        assert!(rx_b.try_recv().is_err());

        assert!(!manager.send_to(SessionId::new(), OutboundMessage::Ping { timestamp: 2 }).await);
    }

    #[tokio::test]
    async fn test_broadcast_skips_dead_sessions() {
        let manager = manager();
        let (_a, mut rx_a) = manager.open(None);
        let (b, _rx_b) = manager.open(None);
        b.mark_dead();

        let msg = OutboundMessage::UpdateBlacklist { items: vec![] };
        assert_eq!(manager.broadcast(msg.clone()).await, 1);
        assert_eq!(rx_a.recv().await, Some(msg));
    }

    #[tokio::test]
    async fn test_close_all() {
        let manager = manager();
        let (a, _rx_a) = manager.open(None);
        let (b, _rx_b) = manager.open(None);
        manager.close_all().await;
        assert_eq!(manager.connection_count(), 0);
        assert!(!a.is_alive());
        assert!(!b.is_alive());
    }
}
