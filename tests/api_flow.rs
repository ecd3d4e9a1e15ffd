//! End-to-end REST flows against a live gateway.

#![allow(clippy::panic)]

mod common;

use reqwest::Method;
use serde_json::json;
use stakepool_gateway::domain::Key;

use common::{MIN_STAKE, TestGateway, account, admin, registry};

#[tokio::test]
async fn health_reports_version() {
    let gw = TestGateway::spawn().await;
    let (status, body) = gw.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn pool_lifecycle_and_ownership() {
    let gw = TestGateway::spawn().await;
    let owner = account("owner");
    let stranger = account("stranger");

    let (status, body) = gw
        .call(
            Method::POST,
            "/api/v1/pools",
            Some(&owner),
            Some(json!({ "name": "", "min_stake": "1" })),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1001);

    let pool_id = gw.create_pool(&owner, "alpha", MIN_STAKE).await;
    let path = format!("/api/v1/pools/{pool_id}");

    let (status, body) = gw
        .call(Method::GET, &format!("{path}/min-stake"), None, None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["min_stake"], MIN_STAKE.to_string());

    let (status, body) = gw
        .call(
            Method::PUT,
            &path,
            Some(&stranger),
            Some(json!({ "name": "hijack", "min_stake": "0" })),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], 2101);

    let (status, body) = gw
        .call(
            Method::PUT,
            &path,
            Some(&owner),
            Some(json!({ "name": "alpha-2", "description": "renamed", "min_stake": "7" })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "alpha-2");
    assert_eq!(body["min_stake"], "7");

    let (status, _) = gw.call(Method::DELETE, &path, Some(&stranger), None).await;
    assert_eq!(status, 403);
    let (status, _) = gw.call(Method::DELETE, &path, Some(&owner), None).await;
    assert_eq!(status, 204);

    let (status, body) = gw.call(Method::GET, &path, None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let gw = TestGateway::spawn().await;
    let missing = Key::from_short_string("notFoundKey");

    for path in [
        format!("/api/v1/pools/{missing}"),
        format!("/api/v1/pools/{missing}/min-stake"),
        format!("/api/v1/escrows/{missing}"),
    ] {
        let (status, body) = gw.call(Method::GET, &path, None, None).await;
        assert_eq!(status, 404, "{path}");
        assert_eq!(body["error"]["details"], "KeyNotFound");
    }
}

#[tokio::test]
async fn caller_header_is_required() {
    let gw = TestGateway::spawn().await;
    let (status, body) = gw
        .call(
            Method::POST,
            "/api/v1/pools",
            None,
            Some(json!({ "name": "x", "min_stake": "1" })),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], 1002);
}

#[tokio::test]
async fn binding_is_admin_only() {
    let gw = TestGateway::spawn().await;
    let (status, body) = gw
        .call(
            Method::POST,
            "/api/v1/admin/bind-registry",
            Some(&account("mallory")),
            Some(json!({ "registry": registry().to_string() })),
        )
        .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"]["code"], 2102);

    gw.bind(&registry()).await;
    let (status, body) = gw
        .call(Method::GET, "/api/v1/admin/registry", None, None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["bound_registry"], registry().to_string());
    assert_eq!(body["admin"], admin().to_string());
}

#[tokio::test]
async fn escrow_requires_matching_binding() {
    let gw = TestGateway::spawn().await;
    let owner = account("owner");
    let pool_id = gw.create_pool(&owner, "alpha", MIN_STAKE).await;
    let request = json!({ "pool_id": pool_id, "value": MIN_STAKE.to_string() });

    let (status, body) = gw
        .call(Method::POST, "/api/v1/escrows", Some(&owner), Some(request.clone()))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], 2201);

    gw.bind(&account("elsewhere")).await;
    let (status, body) = gw
        .call(Method::POST, "/api/v1/escrows", Some(&owner), Some(request))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["error"]["code"], 2202);
}

#[tokio::test]
async fn escrow_stake_deposit_withdraw() {
    let gw = TestGateway::spawn().await;
    let participant = account("participant");
    let other = account("other");
    gw.bind(&registry()).await;
    let pool_id = gw.create_pool(&account("owner"), "alpha", MIN_STAKE).await;

    let (status, body) = gw
        .call(
            Method::POST,
            "/api/v1/escrows",
            Some(&participant),
            Some(json!({ "pool_id": pool_id, "value": (MIN_STAKE - 1).to_string() })),
        )
        .await;
    assert_eq!(status, 422);
    assert_eq!(body["error"]["code"], 4001);

    let escrow_id = gw.create_escrow(&participant, &pool_id, MIN_STAKE).await;
    let base = format!("/api/v1/escrows/{escrow_id}");

    let (status, body) = gw.call(Method::GET, &base, None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["balance"], MIN_STAKE.to_string());
    assert_eq!(body["owner"], participant.to_string());

    let (status, _) = gw
        .call(
            Method::POST,
            &format!("{base}/deposit"),
            Some(&other),
            Some(json!({ "value": "100" })),
        )
        .await;
    assert_eq!(status, 403);

    let (status, body) = gw
        .call(
            Method::POST,
            &format!("{base}/deposit"),
            Some(&participant),
            Some(json!({ "value": "100" })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["balance"], (MIN_STAKE + 100).to_string());

    let (status, body) = gw
        .call(
            Method::POST,
            &format!("{base}/withdraw"),
            Some(&participant),
            Some(json!({ "amount": (MIN_STAKE + 101).to_string() })),
        )
        .await;
    assert_eq!(status, 422);
    assert_eq!(body["error"]["code"], 4002);

    let (status, body) = gw
        .call(
            Method::POST,
            &format!("{base}/withdraw"),
            Some(&participant),
            Some(json!({ "amount": "50" })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["balance"], (MIN_STAKE + 50).to_string());

    let (status, body) = gw
        .call(
            Method::GET,
            &format!("/api/v1/accounts/{participant}/payouts"),
            None,
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["total_paid"], "50");
}

#[tokio::test]
async fn deleting_pool_keeps_escrows() {
    let gw = TestGateway::spawn().await;
    let owner = account("owner");
    let participant = account("participant");
    gw.bind(&registry()).await;
    let pool_id = gw.create_pool(&owner, "alpha", 10).await;
    let escrow_id = gw.create_escrow(&participant, &pool_id, 10).await;

    let (status, _) = gw
        .call(
            Method::DELETE,
            &format!("/api/v1/pools/{pool_id}"),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, 204);

    let (status, body) = gw
        .call(
            Method::GET,
            &format!("/api/v1/escrows?pool_id={pool_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["escrow_id"], escrow_id);
}

#[tokio::test]
async fn malformed_body_uses_error_envelope() {
    let gw = TestGateway::spawn().await;
    let Ok(resp) = gw
        .client
        .post(gw.url("/api/v1/pools"))
        .header("x-caller-address", account("owner").to_string())
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(resp.status().as_u16(), 400);
    let Ok(body) = resp.json::<serde_json::Value>().await else {
        panic!("error body is not JSON");
    };
    assert_eq!(body["error"]["details"], "InvalidRequest");
}
