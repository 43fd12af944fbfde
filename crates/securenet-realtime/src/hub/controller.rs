//! Hub controller: one entry point per RPC plus session close.
//!
//! Each operation is a short sequence of independent steps (registry
//! mutation, store I/O, broadcast). Nothing is rolled back: if a store call
//! fails, registry mutations already applied stay applied and the error is
//! returned to the caller of the RPC.

use std::sync::Arc;

use tracing::{debug, info, warn};

use securenet_core::error::AppError;
use securenet_core::result::AppResult;
use securenet_core::types::id::SessionId;
use securenet_database::PersistentStore;
use securenet_entity::{DeviceRecord, DeviceRegistration};

use crate::message::serializer::deserialize_invocation;
use crate::message::types::{InboundMessage, OutboundMessage};
use crate::message::validator::{is_blank, validate_frame};
use crate::metrics::RealtimeMetrics;
use crate::transport::Transport;

use super::broadcaster::Broadcaster;
use super::registry::ConnectionRegistry;
use super::router::CommandRouter;

/// Error code sent for frames that cannot be parsed or are out of bounds.
pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";

/// Orchestrates the registry, store, broadcaster and router per RPC.
pub struct HubController {
    store: PersistentStore,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<Broadcaster>,
    router: Arc<CommandRouter>,
    transport: Arc<dyn Transport>,
    metrics: Arc<RealtimeMetrics>,
    max_message_bytes: usize,
}

impl std::fmt::Debug for HubController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubController")
            .field("max_message_bytes", &self.max_message_bytes)
            .finish()
    }
}

impl HubController {
    /// Creates a controller over the given collaborators.
    pub fn new(
        store: PersistentStore,
        registry: Arc<ConnectionRegistry>,
        broadcaster: Arc<Broadcaster>,
        router: Arc<CommandRouter>,
        transport: Arc<dyn Transport>,
        metrics: Arc<RealtimeMetrics>,
        max_message_bytes: usize,
    ) -> Self {
        Self {
            store,
            registry,
            broadcaster,
            router,
            transport,
            metrics,
            max_message_bytes,
        }
    }

    /// `RegisterClient`: bind the session, upsert the record as connected,
    /// then push the device list.
    pub async fn register_client(
        &self,
        session: SessionId,
        registration: DeviceRegistration,
    ) -> AppResult<()> {
        if is_blank(&registration.name) {
            debug!(session_id = %session, "Ignoring registration with blank name");
            return Ok(());
        }

        if let Some(previous) = self.registry.bind(&registration.name, session) {
            info!(
                device = %registration.name,
                session_id = %session,
                previous_session = %previous,
                "Device binding superseded"
            );
        }

        let stored = match self.store.devices.find_by_name(&registration.name).await? {
            Some(mut record) => {
                record.apply_registration(&registration);
                self.store.devices.replace(&record).await?
            }
            None => {
                let record = DeviceRecord::from_registration(&registration);
                self.store.devices.insert(&record).await?
            }
        };

        info!(
            device = %stored.name,
            device_id = %stored.id,
            session_id = %session,
            address = %stored.address,
            "Device registered"
        );

        self.broadcaster.push_device_list().await?;
        Ok(())
    }

    /// Session close: release the binding and, if the session owned a
    /// device name, mark that device disconnected and push the device list.
    pub async fn session_closed(&self, session: SessionId) -> AppResult<()> {
        let Some(name) = self.registry.unbind(session) else {
            debug!(session_id = %session, "Closed session held no binding");
            return Ok(());
        };

        let Some(mut record) = self.store.devices.find_by_name(&name).await? else {
            warn!(device = %name, session_id = %session, "Closed session's device has no record");
            return Ok(());
        };

        record.mark_disconnected();
        self.store.devices.replace(&record).await?;
        info!(device = %name, session_id = %session, "Device disconnected");

        self.broadcaster.push_device_list().await?;
        Ok(())
    }

    /// `RequestInitialData`: push both snapshots to every session.
    pub async fn request_initial_data(&self) -> AppResult<()> {
        self.broadcaster.push_device_list().await?;
        self.broadcaster.push_blacklist().await?;
        Ok(())
    }

    /// `AddToBlacklist`: insert if absent, then push the blacklist.
    pub async fn add_to_blacklist(&self, item: &str) -> AppResult<()> {
        if is_blank(item) {
            debug!("Ignoring blank blacklist item");
            return Ok(());
        }

        if self.store.blacklist.insert(item).await? {
            info!(item, "Blacklist item added");
        } else {
            debug!(item, "Blacklist item already present");
        }

        self.broadcaster.push_blacklist().await?;
        Ok(())
    }

    /// `RemoveFromBlacklist`: delete every matching entry, then push the
    /// blacklist.
    pub async fn remove_from_blacklist(&self, item: &str) -> AppResult<()> {
        if is_blank(item) {
            debug!("Ignoring blank blacklist item");
            return Ok(());
        }

        let removed = self.store.blacklist.delete_by_item(item).await?;
        info!(item, removed, "Blacklist item removed");

        self.broadcaster.push_blacklist().await?;
        Ok(())
    }

    /// `SendCommandToPC`: route to the bound session, or drop silently.
    pub async fn send_command_to_pc(
        &self,
        name: &str,
        command: &str,
        parameter: Option<&str>,
    ) -> AppResult<()> {
        self.router.route(name, command, parameter).await;
        Ok(())
    }

    /// Runs one inbound call on behalf of `session`.
    pub async fn dispatch(&self, session: SessionId, message: InboundMessage) -> AppResult<()> {
        match message {
            InboundMessage::RegisterClient {
                name,
                address,
                access_code,
            } => {
                self.register_client(
                    session,
                    DeviceRegistration {
                        name,
                        address,
                        access_code,
                    },
                )
                .await
            }
            InboundMessage::RequestInitialData => self.request_initial_data().await,
            InboundMessage::AddToBlacklist { item } => self.add_to_blacklist(&item).await,
            InboundMessage::RemoveFromBlacklist { item } => {
                self.remove_from_blacklist(&item).await
            }
            InboundMessage::SendCommandToPc {
                name,
                command,
                parameter,
            } => {
                self.send_command_to_pc(&name, &command, parameter.as_deref())
                    .await
            }
            InboundMessage::Pong { .. } => Ok(()),
        }
    }

    /// Handles one raw text frame from `session`.
    ///
    /// Frames that fail validation or parsing get an `INVALID_MESSAGE` error
    /// frame. Otherwise the call is dispatched; if it carried an invocation
    /// id the caller gets a `Completion`, and an uncorrelated failure is
    /// reported with an `Error` frame.
    pub async fn handle_text(&self, session: SessionId, raw: &str) {
        self.metrics.message_received();

        if let Err(e) = validate_frame(raw, self.max_message_bytes) {
            self.reject(session, e).await;
            return;
        }

        let invocation = match deserialize_invocation(raw) {
            Ok(invocation) => invocation,
            Err(e) => {
                self.reject(session, AppError::from(e)).await;
                return;
            }
        };

        let method = invocation.message.method();
        let result = self.dispatch(session, invocation.message).await;

        if let Err(e) = &result {
            self.metrics.rpc_failed();
            warn!(session_id = %session, method, error = %e, "RPC failed");
        }

        let reply = match (invocation.invocation_id, result) {
            (Some(invocation_id), result) => Some(OutboundMessage::Completion {
                invocation_id: Some(invocation_id),
                error: result.err().map(|e| e.message),
            }),
            (None, Err(e)) => Some(OutboundMessage::Error {
                code: e.kind.to_string(),
                message: e.message,
            }),
            (None, Ok(())) => None,
        };

        if let Some(reply) = reply {
            self.transport.send_to(session, reply).await;
        }
    }

    async fn reject(&self, session: SessionId, error: AppError) {
        self.metrics.rpc_failed();
        debug!(session_id = %session, error = %error, "Rejected inbound frame");
        self.transport
            .send_to(
                session,
                OutboundMessage::Error {
                    code: INVALID_MESSAGE.to_string(),
                    message: error.message,
                },
            )
            .await;
    }
}
