//! # securenet-entity
//!
//! Persisted models for the SecureNet hub. Both entities derive `Debug`,
//! `Clone`, `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod blacklist;
pub mod device;

pub use blacklist::BlacklistEntry;
pub use device::{DeviceRecord, DeviceRegistration};
