//! # securenet-database
//!
//! The hub's persistent store: the narrow [`DeviceStore`] and
//! [`BlacklistStore`] interfaces, a PostgreSQL implementation backed by
//! sqlx, and a process-local implementation for tests and database-less
//! deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{BlacklistStore, DeviceStore, PersistentStore};
