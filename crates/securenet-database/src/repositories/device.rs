//! Device repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use securenet_core::error::{AppError, ErrorKind};
use securenet_core::result::AppResult;
use securenet_entity::DeviceRecord;

use crate::store::DeviceStore;

/// PostgreSQL repository for the `devices` table.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for DeviceRepository {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<DeviceRecord>> {
        sqlx::query_as::<_, DeviceRecord>("SELECT * FROM devices WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find device", e))
    }

    async fn find_all(&self) -> AppResult<Vec<DeviceRecord>> {
        sqlx::query_as::<_, DeviceRecord>("SELECT * FROM devices ORDER BY created_at, name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list devices", e))
    }

    async fn insert(&self, record: &DeviceRecord) -> AppResult<DeviceRecord> {
        sqlx::query_as::<_, DeviceRecord>(
            "INSERT INTO devices (id, name, address, access_code, connected, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (name) DO UPDATE SET \
                address = EXCLUDED.address, \
                access_code = EXCLUDED.access_code, \
                connected = EXCLUDED.connected, \
                updated_at = EXCLUDED.updated_at \
             RETURNING *",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.access_code)
        .bind(record.connected)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert device", e))
    }

    async fn replace(&self, record: &DeviceRecord) -> AppResult<DeviceRecord> {
        sqlx::query_as::<_, DeviceRecord>(
            "UPDATE devices SET name = $2, address = $3, access_code = $4, connected = $5, \
             updated_at = $6 WHERE id = $1 RETURNING *",
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.access_code)
        .bind(record.connected)
        .bind(record.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to replace device", e))?
        .ok_or_else(|| AppError::not_found(format!("Device {} not found", record.id)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
