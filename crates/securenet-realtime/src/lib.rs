//! # securenet-realtime
//!
//! Real-time engine for the SecureNet hub. Provides:
//!
//! - Session plumbing: connection handles, pool, heartbeat, and the
//!   [`Transport`] fan-out / unicast primitives
//! - The connection registry binding device names to live sessions
//! - Full-snapshot broadcasts of the device list and blacklist
//! - Best-effort command routing to a single device session
//! - The hub controller that ties these together per RPC

pub mod connection;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod server;
pub mod transport;

pub use connection::manager::ConnectionManager;
pub use hub::broadcaster::Broadcaster;
pub use hub::controller::HubController;
pub use hub::registry::ConnectionRegistry;
pub use hub::router::{CommandRouter, RouteOutcome};
pub use metrics::RealtimeMetrics;
pub use server::RealtimeEngine;
pub use transport::Transport;
