//! Best-effort command routing to a single device session.

use std::sync::Arc;

use tracing::{debug, info};

use securenet_core::types::id::SessionId;

use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;
use crate::transport::Transport;

use super::registry::ConnectionRegistry;

/// What happened to a routed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Queued on the bound session.
    Delivered(SessionId),
    /// No session is bound to the name.
    Offline,
    /// A session is bound but the frame could not be queued.
    Dropped(SessionId),
}

/// Resolves device names to sessions and forwards commands.
///
/// Commands are never queued for offline devices and never touch the store.
pub struct CommandRouter {
    registry: Arc<ConnectionRegistry>,
    transport: Arc<dyn Transport>,
    metrics: Arc<RealtimeMetrics>,
}

impl std::fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRouter").finish()
    }
}

impl CommandRouter {
    /// Creates a router over `registry` and `transport`.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        transport: Arc<dyn Transport>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            registry,
            transport,
            metrics,
        }
    }

    /// Forwards `ReceiveCommand` to the session bound to `name`.
    pub async fn route(&self, name: &str, command: &str, parameter: Option<&str>) -> RouteOutcome {
        let Some(session) = self.registry.lookup(name) else {
            self.metrics.command_dropped();
            debug!(device = name, command, "Command target offline, dropped");
            return RouteOutcome::Offline;
        };

        let message = OutboundMessage::ReceiveCommand {
            command: command.to_string(),
            parameter: parameter.map(str::to_string),
        };

        if self.transport.send_to(session, message).await {
            self.metrics.command_delivered();
            info!(device = name, session_id = %session, command, "Command routed");
            RouteOutcome::Delivered(session)
        } else {
            self.metrics.command_dropped();
            debug!(device = name, session_id = %session, command, "Command could not be queued");
            RouteOutcome::Dropped(session)
        }
    }
}
