//! Blacklist repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use securenet_core::error::{AppError, ErrorKind};
use securenet_core::result::AppResult;
use securenet_core::types::id::BlacklistEntryId;
use securenet_entity::BlacklistEntry;

use crate::store::BlacklistStore;

/// PostgreSQL repository for the `blacklist` table.
#[derive(Debug, Clone)]
pub struct BlacklistRepository {
    pool: PgPool,
}

impl BlacklistRepository {
    /// Create a new blacklist repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistStore for BlacklistRepository {
    async fn find_all(&self) -> AppResult<Vec<BlacklistEntry>> {
        sqlx::query_as::<_, BlacklistEntry>("SELECT * FROM blacklist ORDER BY created_at, item")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list blacklist", e))
    }

    async fn insert(&self, item: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO blacklist (id, item) VALUES ($1, $2) ON CONFLICT (item) DO NOTHING",
        )
        .bind(BlacklistEntryId::new())
        .bind(item)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert blacklist item", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_item(&self, item: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM blacklist WHERE item = $1")
            .bind(item)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete blacklist item", e)
            })?;
        Ok(result.rows_affected())
    }
}
