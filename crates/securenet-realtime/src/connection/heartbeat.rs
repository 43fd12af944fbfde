//! Ping/pong heartbeat for session keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time;

use securenet_core::config::RealtimeConfig;

use super::handle::ConnectionHandle;
use crate::message::types::OutboundMessage;

/// Heartbeat configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Extra silence tolerated after an interval before the session is dead
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
        }
    }
}

/// Run the heartbeat loop for a session.
///
/// Sends periodic pings and returns once the session is dead: either the
/// peer stayed silent longer than `ping_interval + ping_timeout`, or the
/// outbound queue was closed.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.ping_interval.max(Duration::from_millis(1)));
    // The first tick completes immediately.
    interval.tick().await;
    let allowed_silence = config.ping_interval + config.ping_timeout;

    loop {
        interval.tick().await;

        if !handle.is_alive() {
            break;
        }

        let silence = Utc::now() - handle.last_seen().await;
        if let Ok(silence) = silence.to_std()
            && silence > allowed_silence
        {
            tracing::warn!(
                session_id = %handle.id,
                silent_for = ?silence,
                "Heartbeat timeout"
            );
            handle.mark_dead();
            break;
        }

        let ping = OutboundMessage::Ping {
            timestamp: Utc::now().timestamp_millis(),
        };
        if !handle.send(ping) && !handle.is_alive() {
            tracing::debug!(session_id = %handle.id, "Ping send failed, session closed");
            break;
        }
    }

    tracing::debug!(session_id = %handle.id, "Heartbeat loop ended");
}

#[cfg(test)]
mod tests {
    use super::*;
    use securenet_core::types::id::SessionId;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_heartbeat_ends_when_queue_closes() {
        let (tx, rx) = mpsc::channel(4);
        let handle = Arc::new(ConnectionHandle::new(SessionId::new(), None, tx));
        drop(rx);

        let config = HeartbeatConfig {
            ping_interval: Duration::from_millis(10),
            ping_timeout: Duration::from_secs(60),
        };
        time::timeout(Duration::from_secs(5), run_heartbeat(handle.clone(), config))
            .await
            .expect("heartbeat should stop");
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_heartbeat_sends_pings() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = Arc::new(ConnectionHandle::new(SessionId::new(), None, tx));
        let config = HeartbeatConfig {
            ping_interval: Duration::from_millis(10),
            ping_timeout: Duration::from_secs(60),
        };
        let task = tokio::spawn(run_heartbeat(handle.clone(), config));

        let frame = time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("ping expected");
        assert!(matches!(frame, Some(OutboundMessage::Ping { .. })));

        handle.mark_dead();
        time::timeout(Duration::from_secs(5), task)
            .await
            .expect("heartbeat should stop")
            .unwrap();
    }
}
