//! Shared value types.

pub mod id;

pub use id::{BlacklistEntryId, DeviceId, SessionId};
