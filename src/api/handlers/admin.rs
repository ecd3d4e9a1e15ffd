//! Administrative wiring: bind the escrow ledger to a pool registry.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{BindRegistryRequest, RegistryBindingResponse};
use crate::api::json::ApiJson;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /admin/bind-registry` — Bind the escrow ledger to a registry.
/// Administrator only. Rebinding replaces the previous binding.
///
/// # Errors
///
/// Returns [`LedgerError::UnauthorisedAddress`] if the caller is not the
/// administrator.
#[utoipa::path(
    post,
    path = "/api/v1/admin/bind-registry",
    tag = "Admin",
    summary = "Bind the escrow ledger to a pool registry",
    params(
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = BindRegistryRequest,
    responses(
        (status = 200, description = "Binding updated", body = RegistryBindingResponse),
        (status = 403, description = "Caller is not the administrator", body = ErrorResponse),
    )
)]
pub async fn bind_registry(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(req): ApiJson<BindRegistryRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    state
        .ledger_service
        .bind_registry(&caller, req.registry)
        .await?;
    Ok(Json(binding(&state).await))
}

/// `GET /admin/registry` — Current registry binding.
#[utoipa::path(
    get,
    path = "/api/v1/admin/registry",
    tag = "Admin",
    summary = "Show the escrow ledger's registry binding",
    responses(
        (status = 200, description = "Current binding", body = RegistryBindingResponse),
    )
)]
pub async fn get_binding(State(state): State<AppState>) -> impl IntoResponse {
    Json(binding(&state).await)
}

async fn binding(state: &AppState) -> RegistryBindingResponse {
    let service = &state.ledger_service;
    RegistryBindingResponse {
        bound_registry: service.bound_registry().await,
        hosted_registry: service.registry_address(),
        admin: service.admin(),
        custody: service.custody().await,
    }
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/bind-registry", post(bind_registry))
        .route("/admin/registry", get(get_binding))
}
