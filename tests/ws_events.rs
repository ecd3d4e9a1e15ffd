//! WebSocket event feed: subscriptions and filtering.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use common::{MIN_STAKE, TestGateway, account, registry};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(gw: &TestGateway) -> Socket {
    let Ok((socket, _)) = connect_async(gw.ws_url()).await else {
        panic!("ws connect failed");
    };
    socket
}

async fn send_command(socket: &mut Socket, payload: Value) {
    let msg = json!({
        "id": "cmd-1",
        "type": "command",
        "timestamp": "2024-01-01T00:00:00Z",
        "payload": payload,
    });
    if socket.send(Message::text(msg.to_string())).await.is_err() {
        panic!("ws send failed");
    }
}

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let Ok(Some(Ok(msg))) = tokio::time::timeout(Duration::from_secs(5), socket.next()).await
        else {
            panic!("no ws message within timeout");
        };
        if let Message::Text(text) = msg {
            let Ok(value) = serde_json::from_str(text.as_str()) else {
                panic!("ws message is not JSON");
            };
            return value;
        }
    }
}

#[tokio::test]
async fn wildcard_receives_pool_created() {
    let gw = TestGateway::spawn().await;
    let mut socket = connect(&gw).await;

    send_command(&mut socket, json!({ "command": "subscribe", "keys": ["*"] })).await;
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["type"], "response");
    assert_eq!(ack["payload"]["wildcard"], true);

    let pool_id = gw.create_pool(&account("owner"), "alpha", MIN_STAKE).await;

    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "pool_created");
    assert_eq!(event["payload"]["pool_id"], pool_id);
}

#[tokio::test]
async fn pool_subscription_filters_other_pools() {
    let gw = TestGateway::spawn().await;
    gw.bind(&registry()).await;
    let owner = account("owner");
    let watched = gw.create_pool(&owner, "watched", 10).await;
    let ignored = gw.create_pool(&owner, "ignored", 10).await;

    let mut socket = connect(&gw).await;
    send_command(&mut socket, json!({ "command": "subscribe", "keys": [watched] })).await;
    let ack = next_json(&mut socket).await;
    assert_eq!(ack["payload"]["count"], 1);

    let participant = account("participant");
    let _ = gw.create_escrow(&participant, &ignored, 10).await;
    let escrow_id = gw.create_escrow(&participant, &watched, 10).await;

    let event = next_json(&mut socket).await;
    assert_eq!(event["payload"]["event_type"], "escrow_created");
    assert_eq!(event["payload"]["escrow_id"], escrow_id);
    assert_eq!(event["payload"]["pool_id"], watched);
}

#[tokio::test]
async fn malformed_command_returns_error() {
    let gw = TestGateway::spawn().await;
    let mut socket = connect(&gw).await;
    if socket.send(Message::text("not json")).await.is_err() {
        panic!("ws send failed");
    }
    let reply = next_json(&mut socket).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 400);
}
