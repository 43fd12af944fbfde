//! In-memory blacklist store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use securenet_core::result::AppResult;
use securenet_entity::BlacklistEntry;

use crate::store::BlacklistStore;

/// Blacklist entries keyed by item.
#[derive(Debug, Default)]
pub struct MemoryBlacklistStore {
    by_item: DashMap<String, BlacklistEntry>,
}

impl MemoryBlacklistStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlacklistStore for MemoryBlacklistStore {
    async fn find_all(&self) -> AppResult<Vec<BlacklistEntry>> {
        let mut entries: Vec<BlacklistEntry> = self
            .by_item
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by(|a, b| (a.created_at, &a.item).cmp(&(b.created_at, &b.item)));
        Ok(entries)
    }

    async fn insert(&self, item: &str) -> AppResult<bool> {
        match self.by_item.entry(item.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(BlacklistEntry::new(item));
                Ok(true)
            }
        }
    }

    async fn delete_by_item(&self, item: &str) -> AppResult<u64> {
        Ok(self.by_item.remove(item).map_or(0, |_| 1))
    }
}
