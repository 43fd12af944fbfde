//! Connection pool tracking all live sessions by id.

use std::sync::Arc;

use dashmap::DashMap;

use securenet_core::types::id::SessionId;

use super::handle::ConnectionHandle;

/// Thread-safe pool of all live sessions.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    by_id: DashMap<SessionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes a session from the pool.
    pub fn remove(&self, id: &SessionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(id).map(|(_, handle)| handle)
    }

    /// Gets a specific session by ID.
    pub fn get(&self, id: &SessionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(id).map(|entry| entry.value().clone())
    }

    /// Returns total number of live sessions.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns all session handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
