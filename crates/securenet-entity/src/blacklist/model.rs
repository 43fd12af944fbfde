//! Blacklist entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use securenet_core::types::id::BlacklistEntryId;

/// A blacklisted word or URL shared with every device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistEntry {
    /// Store-assigned identifier.
    pub id: BlacklistEntryId,
    /// The blacklisted value; unique within the collection.
    pub item: String,
    /// When the entry was added.
    pub created_at: DateTime<Utc>,
}

impl BlacklistEntry {
    /// Create a new entry for `item`.
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            id: BlacklistEntryId::new(),
            item: item.into(),
            created_at: Utc::now(),
        }
    }
}
