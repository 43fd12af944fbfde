//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use futures::{SinkExt, StreamExt};
use http::{Request, StatusCode};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tower::ServiceExt;

use securenet_api::{AppState, build_router};
use securenet_core::config::{AppConfig, StoreProvider};
use securenet_database::PersistentStore;
use securenet_realtime::RealtimeEngine;

/// A hub client socket.
pub type HubSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long to wait for an expected frame.
const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The engine behind the router
    pub engine: Arc<RealtimeEngine>,
    /// Store shared with the engine
    pub store: PersistentStore,
}

/// Test response
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Config for tests: in-memory store, heartbeat out of the way.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.store.provider = StoreProvider::Memory;
    config.realtime.ping_interval_seconds = 3600;
    config
}

impl TestApp {
    /// Create a new test application over a fresh in-memory store
    pub fn new() -> Self {
        let config = Arc::new(test_config());
        let store = PersistentStore::memory();
        let engine = Arc::new(RealtimeEngine::new(config.realtime.clone(), store.clone()));
        let router = build_router(AppState::new(config, engine.clone(), store.clone()));
        Self {
            router,
            engine,
            store,
        }
    }

    /// Make an HTTP request against the router
    pub async fn request(&self, method: &str, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the router on an ephemeral local port
    pub async fn spawn(self) -> TestServer {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        TestServer { app: self, addr }
    }
}

/// A running test server
pub struct TestServer {
    /// The application being served
    pub app: TestApp,
    /// Bound address
    pub addr: SocketAddr,
}

impl TestServer {
    /// Open a hub session
    pub async fn connect(&self) -> HubSocket {
        let url = format!("ws://{}/hub", self.addr);
        let (socket, _) = connect_async(url).await.expect("Failed to connect to hub");
        socket
    }
}

/// Send one JSON frame
pub async fn send(socket: &mut HubSocket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receive the next hub frame, skipping pings
pub async fn recv(socket: &mut HubSocket) -> Value {
    loop {
        let message = tokio::time::timeout(FRAME_TIMEOUT, socket.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Socket closed")
            .expect("Socket error");

        if let Message::Text(text) = message {
            let frame: Value = serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
            if frame["type"] != "Ping" {
                return frame;
            }
        }
    }
}

/// Assert that no hub frame arrives within `window`
pub async fn assert_silent(socket: &mut HubSocket, window: Duration) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        match tokio::time::timeout_at(deadline, socket.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Text(text)))) => {
                let frame: Value = serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
                assert_eq!(frame["type"], "Ping", "Unexpected frame: {frame}");
            }
            Ok(Some(Ok(_))) => {}
            Ok(other) => panic!("Socket ended: {other:?}"),
        }
    }
}

/// Wait until the server has observed `count` live sessions
pub async fn wait_for_connections(server: &TestServer, count: usize) {
    let deadline = tokio::time::Instant::now() + FRAME_TIMEOUT;
    while server.app.engine.connections.connection_count() != count {
        assert!(
            tokio::time::Instant::now() < deadline,
            "Expected {count} sessions"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
