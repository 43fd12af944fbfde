//! Integration tests for the health endpoints.

mod helpers;

use http::StatusCode;

use helpers::{TestApp, wait_for_connections};

#[tokio::test]
async fn test_ws_upgrade_without_handshake() {
    let app = TestApp::new();

    let response = app.request("GET", "/hub").await;

    assert!(
        response.status == StatusCode::BAD_REQUEST
            || response.status == StatusCode::UPGRADE_REQUIRED,
        "Expected 400 or 426, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert!(response.body["data"]["version"].is_string());
}

#[tokio::test]
async fn test_detailed_health_check() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health/detailed").await;

    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["status"], "ok");
    assert_eq!(data["store"], "connected");
    assert_eq!(data["connections"], 0);
    assert_eq!(data["bound_devices"], 0);
    assert!(data["metrics"].is_object());
}

#[tokio::test]
async fn test_detailed_health_counts_sessions() {
    let server = TestApp::new().spawn().await;
    let _a = server.connect().await;
    let _b = server.connect().await;
    wait_for_connections(&server, 2).await;

    let response = server.app.request("GET", "/api/health/detailed").await;

    assert_eq!(response.body["data"]["connections"], 2);
    assert_eq!(response.body["data"]["metrics"]["connections_total"], 2);
}
