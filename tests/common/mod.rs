//! Shared harness: runs the real router on an ephemeral port.

#![allow(clippy::panic, dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use stakepool_gateway::api::build_app;
use stakepool_gateway::api::caller::CALLER_HEADER;
use stakepool_gateway::app_state::AppState;
use stakepool_gateway::config::DEFAULT_REGISTRY_LABEL;
use stakepool_gateway::domain::{Address, EventBus};
use stakepool_gateway::service::LedgerService;

pub const MIN_STAKE: u128 = 1_050_975_209;

pub fn admin() -> Address {
    Address::derive("admin")
}

pub fn registry() -> Address {
    Address::derive(DEFAULT_REGISTRY_LABEL)
}

pub fn account(label: &str) -> Address {
    Address::derive(label)
}

/// Running gateway plus an HTTP client pointed at it.
#[derive(Debug)]
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestGateway {
    pub async fn spawn() -> Self {
        let service = LedgerService::shared(admin(), registry(), EventBus::new(256));
        let app = build_app(AppState::new(service), Duration::from_secs(5));

        let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("no local addr");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Sends a request and returns the status code with the parsed body
    /// (`Value::Null` for empty bodies).
    pub async fn call(
        &self,
        method: reqwest::Method,
        path: &str,
        caller: Option<&Address>,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut req = self.client.request(method, self.url(path));
        if let Some(caller) = caller {
            req = req.header(CALLER_HEADER, caller.to_string());
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let Ok(resp) = req.send().await else {
            panic!("request to {path} failed");
        };
        let status = resp.status().as_u16();
        let Ok(text) = resp.text().await else {
            panic!("unreadable body from {path}");
        };
        let value = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        (status, value)
    }

    pub async fn bind(&self, registry: &Address) {
        let (status, _) = self
            .call(
                reqwest::Method::POST,
                "/api/v1/admin/bind-registry",
                Some(&admin()),
                Some(serde_json::json!({ "registry": registry.to_string() })),
            )
            .await;
        assert_eq!(status, 200);
    }

    pub async fn create_pool(&self, owner: &Address, name: &str, min_stake: u128) -> String {
        let (status, body) = self
            .call(
                reqwest::Method::POST,
                "/api/v1/pools",
                Some(owner),
                Some(serde_json::json!({
                    "name": name,
                    "description": "test pool",
                    "min_stake": min_stake.to_string(),
                })),
            )
            .await;
        assert_eq!(status, 201, "create pool: {body}");
        let Some(id) = body["pool_id"].as_str() else {
            panic!("pool_id missing: {body}");
        };
        id.to_string()
    }

    pub async fn create_escrow(&self, owner: &Address, pool_id: &str, stake: u128) -> String {
        let (status, body) = self
            .call(
                reqwest::Method::POST,
                "/api/v1/escrows",
                Some(owner),
                Some(serde_json::json!({ "pool_id": pool_id, "value": stake.to_string() })),
            )
            .await;
        assert_eq!(status, 201, "create escrow: {body}");
        let Some(id) = body["escrow_id"].as_str() else {
            panic!("escrow_id missing: {body}");
        };
        id.to_string()
    }
}
