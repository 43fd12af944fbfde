//! Hub metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Hub-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    messages_received: AtomicU64,
    messages_sent: AtomicU64,
    broadcasts: AtomicU64,
    commands_delivered: AtomicU64,
    commands_dropped: AtomicU64,
    rpc_failures: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed session
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record an inbound frame
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` frames queued for delivery
    pub fn message_sent_count(&self, count: u64) {
        self.messages_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a snapshot broadcast
    pub fn broadcast_sent(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command handed to a device session
    pub fn command_delivered(&self) {
        self.commands_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a command with no live recipient
    pub fn command_dropped(&self) {
        self.commands_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an RPC that reported failure to its caller
    pub fn rpc_failed(&self) {
        self.rpc_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            commands_delivered: self.commands_delivered.load(Ordering::Relaxed),
            commands_dropped: self.commands_dropped.load(Ordering::Relaxed),
            rpc_failures: self.rpc_failures.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sessions ever opened
    pub connections_total: u64,
    /// Sessions currently open
    pub connections_active: u64,
    /// Inbound frames
    pub messages_received: u64,
    /// Outbound frames queued
    pub messages_sent: u64,
    /// Snapshot broadcasts
    pub broadcasts: u64,
    /// Commands queued to a device
    pub commands_delivered: u64,
    /// Commands dropped for lack of a live recipient
    pub commands_dropped: u64,
    /// RPCs that reported failure
    pub rpc_failures: u64,
}
