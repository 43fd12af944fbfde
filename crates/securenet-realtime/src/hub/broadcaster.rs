//! Full-snapshot broadcasts of the device list and the blacklist.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use securenet_core::result::AppResult;
use securenet_database::PersistentStore;

use crate::message::types::OutboundMessage;
use crate::metrics::RealtimeMetrics;
use crate::transport::Transport;

/// Pushes full snapshots to every connected session.
///
/// Each kind of snapshot has its own gate, held across the store read and
/// the fan-out, so a session never receives an older snapshot after a newer
/// one of the same kind.
pub struct Broadcaster {
    store: PersistentStore,
    transport: Arc<dyn Transport>,
    metrics: Arc<RealtimeMetrics>,
    device_gate: Mutex<()>,
    blacklist_gate: Mutex<()>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster").finish()
    }
}

impl Broadcaster {
    /// Creates a broadcaster over `store` and `transport`.
    pub fn new(
        store: PersistentStore,
        transport: Arc<dyn Transport>,
        metrics: Arc<RealtimeMetrics>,
    ) -> Self {
        Self {
            store,
            transport,
            metrics,
            device_gate: Mutex::new(()),
            blacklist_gate: Mutex::new(()),
        }
    }

    /// Sends `UpdatePCList` with every device record.
    ///
    /// Returns the number of sessions the snapshot was queued for.
    pub async fn push_device_list(&self) -> AppResult<usize> {
        let _gate = self.device_gate.lock().await;
        let devices = self.store.devices.find_all().await?;
        let count = devices.len();
        let recipients = self
            .transport
            .broadcast(OutboundMessage::UpdatePcList { devices })
            .await;
        self.metrics.broadcast_sent();
        debug!(devices = count, recipients, "Device list broadcast");
        Ok(recipients)
    }

    /// Sends `UpdateBlacklist` with every blacklisted item (ids stripped).
    pub async fn push_blacklist(&self) -> AppResult<usize> {
        let _gate = self.blacklist_gate.lock().await;
        let items: Vec<String> = self
            .store
            .blacklist
            .find_all()
            .await?
            .into_iter()
            .map(|entry| entry.item)
            .collect();
        let count = items.len();
        let recipients = self
            .transport
            .broadcast(OutboundMessage::UpdateBlacklist { items })
            .await;
        self.metrics.broadcast_sent();
        debug!(items = count, recipients, "Blacklist broadcast");
        Ok(recipients)
    }
}
