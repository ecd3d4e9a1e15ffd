//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`. Calls that act on behalf of
//! an account identify it through the `x-caller-address` header.

pub mod caller;
pub mod dto;
pub mod handlers;
pub mod json;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// OpenAPI document aggregating every REST handler and schema.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "stakepool-gateway",
        description = "Pool registry and escrow ledger with a WebSocket event feed"
    ),
    paths(
        handlers::system::health_handler,
        handlers::admin::bind_registry,
        handlers::admin::get_binding,
        handlers::pool::create_pool,
        handlers::pool::list_pools,
        handlers::pool::get_pool,
        handlers::pool::update_pool,
        handlers::pool::delete_pool,
        handlers::pool::get_min_stake,
        handlers::escrow::create_escrow,
        handlers::escrow::list_escrows,
        handlers::escrow::get_escrow,
        handlers::escrow::deposit,
        handlers::escrow::withdraw,
        handlers::account::get_payouts,
    ),
    components(schemas(crate::error::ErrorResponse, crate::error::ErrorBody)),
    tags(
        (name = "System", description = "Service health"),
        (name = "Admin", description = "Escrow ledger wiring"),
        (name = "Pools", description = "Pool registry"),
        (name = "Escrows", description = "Escrow ledger"),
        (name = "Accounts", description = "Account payouts"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST routes, `/ws`, Swagger UI (when the
/// `swagger-ui` feature is on) and the HTTP middleware stack.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router().route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
