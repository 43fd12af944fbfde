//! Integration tests for the hub over real WebSocket sessions.

mod helpers;

use std::time::Duration;

use futures::SinkExt;
use serde_json::json;

use helpers::{TestApp, assert_silent, recv, send, wait_for_connections};

const QUIET: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_pc1_scenario() {
    let server = TestApp::new().spawn().await;
    let mut device = server.connect().await;
    let mut operator = server.connect().await;
    wait_for_connections(&server, 2).await;

    send(
        &mut device,
        json!({
            "type": "RegisterClient",
            "invocationId": "r1",
            "name": "PC1",
            "address": "10.0.0.5",
            "accessCode": "ABC"
        }),
    )
    .await;

    let update = recv(&mut operator).await;
    assert_eq!(update["type"], "UpdatePCList");
    assert_eq!(update["devices"].as_array().unwrap().len(), 1);
    assert_eq!(update["devices"][0]["name"], "PC1");
    assert_eq!(update["devices"][0]["connected"], true);

    assert_eq!(recv(&mut device).await["type"], "UpdatePCList");
    let completion = recv(&mut device).await;
    assert_eq!(completion["type"], "Completion");
    assert_eq!(completion["invocationId"], "r1");
    assert!(completion["error"].is_null());

    send(
        &mut operator,
        json!({"type": "SendCommandToPC", "invocationId": "c1", "name": "PC1", "command": "Lock"}),
    )
    .await;
    let command = recv(&mut device).await;
    assert_eq!(command["type"], "ReceiveCommand");
    assert_eq!(command["command"], "Lock");
    assert!(command["parameter"].is_null());
    assert_eq!(recv(&mut operator).await["type"], "Completion");

    device.close(None).await.expect("close device");
    let update = recv(&mut operator).await;
    assert_eq!(update["type"], "UpdatePCList");
    assert_eq!(update["devices"][0]["connected"], false);
    wait_for_connections(&server, 1).await;

    send(
        &mut operator,
        json!({"type": "SendCommandToPC", "invocationId": "c2", "name": "PC1", "command": "Lock"}),
    )
    .await;
    let completion = recv(&mut operator).await;
    assert_eq!(completion["type"], "Completion");
    assert!(completion["error"].is_null());
    assert_silent(&mut operator, QUIET).await;
}

#[tokio::test]
async fn test_ghost_command_delivers_nothing() {
    let server = TestApp::new().spawn().await;
    let mut operator = server.connect().await;
    let mut bystander = server.connect().await;
    wait_for_connections(&server, 2).await;

    send(
        &mut operator,
        json!({"type": "SendCommandToPC", "name": "Ghost", "command": "Lock", "parameter": "now"}),
    )
    .await;

    assert_silent(&mut operator, QUIET).await;
    assert_silent(&mut bystander, QUIET).await;
    assert_eq!(server.app.engine.metrics.snapshot().commands_dropped, 1);
}

#[tokio::test]
async fn test_blacklist_add_and_remove() {
    let server = TestApp::new().spawn().await;
    let mut operator = server.connect().await;
    let mut watcher = server.connect().await;
    wait_for_connections(&server, 2).await;

    for _ in 0..2 {
        send(&mut operator, json!({"type": "AddToBlacklist", "item": "chrome.exe"})).await;
        let update = recv(&mut watcher).await;
        assert_eq!(update, json!({"type": "UpdateBlacklist", "items": ["chrome.exe"]}));
    }
    assert_eq!(server.app.store.blacklist.find_all().await.unwrap().len(), 1);

    send(&mut operator, json!({"type": "RemoveFromBlacklist", "item": "steam.exe"})).await;
    assert_eq!(
        recv(&mut watcher).await,
        json!({"type": "UpdateBlacklist", "items": ["chrome.exe"]})
    );

    send(&mut operator, json!({"type": "RemoveFromBlacklist", "item": "chrome.exe"})).await;
    assert_eq!(
        recv(&mut watcher).await,
        json!({"type": "UpdateBlacklist", "items": []})
    );
}

#[tokio::test]
async fn test_request_initial_data_is_idempotent() {
    let server = TestApp::new().spawn().await;
    let mut device = server.connect().await;
    let mut operator = server.connect().await;
    wait_for_connections(&server, 2).await;

    send(
        &mut device,
        json!({"type": "RegisterClient", "name": "PC1", "address": "10.0.0.5", "accessCode": "ABC"}),
    )
    .await;
    recv(&mut operator).await;
    send(&mut operator, json!({"type": "AddToBlacklist", "item": "chrome.exe"})).await;
    recv(&mut operator).await;

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        send(&mut operator, json!({"type": "RequestInitialData"})).await;
        let devices = recv(&mut operator).await;
        let blacklist = recv(&mut operator).await;
        assert_eq!(devices["type"], "UpdatePCList");
        assert_eq!(blacklist["type"], "UpdateBlacklist");
        snapshots.push((devices, blacklist));
    }
    assert_eq!(snapshots[0], snapshots[1]);
    assert_eq!(server.app.store.devices.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_reregistration_supersedes_binding() {
    let server = TestApp::new().spawn().await;
    let mut first = server.connect().await;
    let mut second = server.connect().await;
    wait_for_connections(&server, 2).await;

    let register = json!({"type": "RegisterClient", "invocationId": "r", "name": "PC1", "address": "10.0.0.5", "accessCode": "ABC"});
    send(&mut first, register.clone()).await;
    recv(&mut first).await;
    recv(&mut first).await;
    recv(&mut second).await;

    send(&mut second, register).await;
    recv(&mut second).await;
    recv(&mut second).await;
    recv(&mut first).await;

    let record = server
        .app
        .store
        .devices
        .find_by_name("PC1")
        .await
        .unwrap()
        .unwrap();
    assert!(record.connected);
    assert_eq!(server.app.store.devices.find_all().await.unwrap().len(), 1);

    // The superseded session closing must not flip the device offline.
    first.close(None).await.expect("close first");
    wait_for_connections(&server, 1).await;
    assert_silent(&mut second, QUIET).await;
    let record = server
        .app
        .store
        .devices
        .find_by_name("PC1")
        .await
        .unwrap()
        .unwrap();
    assert!(record.connected);
}

#[tokio::test]
async fn test_invalid_frame_gets_error() {
    let server = TestApp::new().spawn().await;
    let mut session = server.connect().await;
    wait_for_connections(&server, 1).await;

    session
        .send(tokio_tungstenite::tungstenite::Message::Text("{not json".into()))
        .await
        .unwrap();
    let error = recv(&mut session).await;
    assert_eq!(error["type"], "Error");
    assert_eq!(error["code"], "INVALID_MESSAGE");
}
