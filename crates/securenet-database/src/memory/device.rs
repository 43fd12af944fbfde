//! In-memory device store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use securenet_core::error::AppError;
use securenet_core::result::AppResult;
use securenet_entity::DeviceRecord;

use crate::store::DeviceStore;

/// Device records keyed by name, which keeps `name` unique by construction.
#[derive(Debug, Default)]
pub struct MemoryDeviceStore {
    by_name: DashMap<String, DeviceRecord>,
}

impl MemoryDeviceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[async_trait]
impl DeviceStore for MemoryDeviceStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<DeviceRecord>> {
        Ok(self.by_name.get(name).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<DeviceRecord>> {
        let mut records: Vec<DeviceRecord> = self
            .by_name
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| (a.created_at, &a.name).cmp(&(b.created_at, &b.name)));
        Ok(records)
    }

    async fn insert(&self, record: &DeviceRecord) -> AppResult<DeviceRecord> {
        let stored = match self.by_name.entry(record.name.clone()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                existing.address = record.address.clone();
                existing.access_code = record.access_code.clone();
                existing.connected = record.connected;
                existing.updated_at = Utc::now();
                existing.clone()
            }
            Entry::Vacant(vacant) => vacant.insert(record.clone()).value().clone(),
        };
        Ok(stored)
    }

    async fn replace(&self, record: &DeviceRecord) -> AppResult<DeviceRecord> {
        match self.by_name.get_mut(&record.name) {
            Some(mut existing) if existing.id == record.id => {
                *existing = record.clone();
                Ok(record.clone())
            }
            _ => Err(AppError::not_found(format!(
                "Device {} not found",
                record.id
            ))),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
