//! Response DTOs for the HTTP endpoints.

use serde::{Deserialize, Serialize};

use securenet_realtime::metrics::MetricsSnapshot;

/// Standard success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the process started.
    pub uptime_seconds: u64,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"`, or `"degraded"` if the store is unreachable.
    pub status: String,
    /// `"connected"` or `"unavailable"`.
    pub store: String,
    /// Live sessions.
    pub connections: usize,
    /// Device names currently bound to a session.
    pub bound_devices: usize,
    /// Hub counters.
    pub metrics: MetricsSnapshot,
}
