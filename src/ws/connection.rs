//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{Key, LedgerEvent};

const WILDCARD: &str = "*";

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<LedgerEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(ledger_event) => {
                        if !subs.matches(&ledger_event) {
                            continue;
                        }
                        let Some(json) = event_envelope(&ledger_event) else {
                            continue;
                        };
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

fn event_envelope(event: &LedgerEvent) -> Option<String> {
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(
        uuid::Uuid::new_v4().to_string(),
        WsMessageType::Event,
        payload,
    );
    serde_json::to_string(&msg).ok()
}

/// Splits raw key strings into parsed keys and a wildcard flag.
fn parse_keys(raw: &[String]) -> Result<(Vec<Key>, bool), String> {
    let mut keys = Vec::with_capacity(raw.len());
    let mut wildcard = false;
    for s in raw {
        if s == WILDCARD {
            wildcard = true;
        } else {
            keys.push(s.parse::<Key>().map_err(|e| e.to_string())?);
        }
    }
    Ok((keys, wildcard))
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error(String::new(), 400, "malformed JSON"))
            .ok();
    };

    if msg.msg_type != WsMessageType::Command {
        return serde_json::to_string(&WsMessage::error(msg.id, 400, "expected a command"))
            .ok();
    }

    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let response = match command {
        WsCommand::Subscribe { keys } => match parse_keys(&keys) {
            Ok((keys, wildcard)) => {
                subs.subscribe(&keys, wildcard);
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "subscribed": keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(reason) => WsMessage::error(msg.id, 400, &reason),
        },
        WsCommand::Unsubscribe { keys } => match parse_keys(&keys) {
            Ok((keys, wildcard)) => {
                subs.unsubscribe(&keys, wildcard);
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "unsubscribed": keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "remaining_count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(reason) => WsMessage::error(msg.id, 400, &reason),
        },
    };
    serde_json::to_string(&response).ok()
}
