//! Persistent store interfaces.
//!
//! The hub only ever needs find-by-field, insert, replace and delete over
//! two collections, so the interfaces stay that narrow. Each method is an
//! independent I/O step; nothing here spans a transaction.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use securenet_core::config::{AppConfig, StoreProvider};
use securenet_core::result::AppResult;
use securenet_entity::{BlacklistEntry, DeviceRecord};

use crate::connection::DatabasePool;
use crate::memory::{MemoryBlacklistStore, MemoryDeviceStore};
use crate::migration::run_migrations;
use crate::repositories::{BlacklistRepository, DeviceRepository};

/// The `devices` collection.
#[async_trait]
pub trait DeviceStore: Send + Sync + 'static {
    /// Find the record registered under `name`.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<DeviceRecord>>;

    /// Return every device record.
    async fn find_all(&self) -> AppResult<Vec<DeviceRecord>>;

    /// Insert a new record and return it as stored.
    ///
    /// If a concurrent registration already created a record with the same
    /// name, that record is refreshed instead so `name` stays unique.
    async fn insert(&self, record: &DeviceRecord) -> AppResult<DeviceRecord>;

    /// Replace an existing record (matched by id) and return it as stored.
    async fn replace(&self, record: &DeviceRecord) -> AppResult<DeviceRecord>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// The `blacklist` collection.
#[async_trait]
pub trait BlacklistStore: Send + Sync + 'static {
    /// Return every entry.
    async fn find_all(&self) -> AppResult<Vec<BlacklistEntry>>;

    /// Insert `item`. Returns `false` if it was already present.
    async fn insert(&self, item: &str) -> AppResult<bool>;

    /// Delete every entry matching `item`. Returns the number removed.
    async fn delete_by_item(&self, item: &str) -> AppResult<u64>;
}

/// Both collections, behind shared trait objects.
#[derive(Clone)]
pub struct PersistentStore {
    /// Device registry.
    pub devices: Arc<dyn DeviceStore>,
    /// Blacklist.
    pub blacklist: Arc<dyn BlacklistStore>,
}

impl fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentStore").finish()
    }
}

impl PersistentStore {
    /// Assemble a store from explicit collection implementations.
    pub fn new(devices: Arc<dyn DeviceStore>, blacklist: Arc<dyn BlacklistStore>) -> Self {
        Self { devices, blacklist }
    }

    /// Process-local store.
    pub fn memory() -> Self {
        Self::new(
            Arc::new(MemoryDeviceStore::new()),
            Arc::new(MemoryBlacklistStore::new()),
        )
    }

    /// PostgreSQL-backed store sharing one pool.
    pub fn postgres(pool: &DatabasePool) -> Self {
        Self::new(
            Arc::new(DeviceRepository::new(pool.pool().clone())),
            Arc::new(BlacklistRepository::new(pool.pool().clone())),
        )
    }

    /// Open the store selected by `store.provider`.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        match config.store.provider {
            StoreProvider::Memory => {
                info!("Using in-memory store; state is not persisted across restarts");
                Ok(Self::memory())
            }
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                if config.database.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(&pool))
            }
        }
    }
}
