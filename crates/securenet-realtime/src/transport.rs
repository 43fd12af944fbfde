//! The push primitives the hub needs from the real-time channel.

use async_trait::async_trait;

use securenet_core::types::id::SessionId;

use crate::message::types::OutboundMessage;

/// Fan-out and unicast over live sessions.
///
/// Both primitives are best-effort: a dead or saturated session simply
/// misses the frame.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver `message` to one session. Returns whether it was queued.
    async fn send_to(&self, session: SessionId, message: OutboundMessage) -> bool;

    /// Deliver `message` to every live session. Returns how many queued it.
    async fn broadcast(&self, message: OutboundMessage) -> usize;
}
