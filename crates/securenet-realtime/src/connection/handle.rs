//! Individual session handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};

use securenet_core::types::id::SessionId;

use crate::message::types::OutboundMessage;

/// A handle to a single live session.
///
/// Holds the sender side of the session's outbound queue plus liveness
/// metadata. The queue is drained by the socket writer task.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Session identifier.
    pub id: SessionId,
    /// Peer address, if the transport knows it.
    pub remote_addr: Option<String>,
    /// Sender for outbound messages.
    sender: mpsc::Sender<OutboundMessage>,
    /// When the session was opened.
    pub connected_at: DateTime<Utc>,
    /// Last inbound frame of any kind (including pongs).
    last_seen: RwLock<DateTime<Utc>>,
    /// Whether the session is still alive.
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new session handle.
    pub fn new(
        id: SessionId,
        remote_addr: Option<String>,
        sender: mpsc::Sender<OutboundMessage>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            remote_addr,
            sender,
            connected_at: now,
            last_seen: RwLock::new(now),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound message without waiting.
    ///
    /// Returns `false` if the session is dead or its queue is full.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(session_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the session is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the session as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Record inbound activity.
    pub async fn touch(&self) {
        let mut seen = self.last_seen.write().await;
        *seen = Utc::now();
    }

    /// Last inbound activity.
    pub async fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.read().await
    }
}
