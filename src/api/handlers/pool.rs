//! Pool registry handlers: create, list, get, update, delete, min-stake.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{
    CreatePoolResponse, MinStakeResponse, PaginationMeta, PoolDetailResponse, PoolListParams,
    PoolListResponse, PoolRequest, PoolSummaryDto,
};
use crate::api::json::ApiJson;
use crate::app_state::AppState;
use crate::domain::PoolId;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /pools` — Create a pool owned by the caller.
///
/// # Errors
///
/// Returns [`LedgerError::EmptyString`] if the name is empty.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a staking pool",
    description = "Creates a pool owned by the caller. The pool id is derived from the caller, a registry sequence number, the name and the description.",
    params(
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = PoolRequest,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponse),
        (status = 400, description = "Empty name or bad caller", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(req): ApiJson<PoolRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let pool_id = state
        .ledger_service
        .create_pool(&caller, req.name, req.description, req.min_stake)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePoolResponse {
            pool_id,
            owner: caller,
        }),
    ))
}

/// `GET /pools` — List pools with pagination and an optional owner filter.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRequest`] on a malformed owner filter.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of pools ordered by creation time, optionally filtered by owner.",
    params(PoolListParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
        (status = 400, description = "Malformed owner filter", body = ErrorResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PoolListParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let owner = params.owner()?;
    let summaries = state.ledger_service.list_pools(owner.as_ref()).await;
    let (page, pagination) = PaginationMeta::paginate(summaries, params.page, params.per_page);

    Ok(Json(PoolListResponse {
        data: page.into_iter().map(PoolSummaryDto::from).collect(),
        pagination,
    }))
}

/// `GET /pools/:id` — Get pool details.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Get pool details",
    params(
        ("id" = String, Path, description = "Pool id (32-byte hex)"),
    ),
    responses(
        (status = 200, description = "Pool details", body = PoolDetailResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let pool_id: PoolId = id.parse()?;
    let pool = state.ledger_service.get_pool(pool_id).await?;
    Ok(Json(PoolDetailResponse::from(pool)))
}

/// `PUT /pools/:id` — Overwrite a pool's name, description and minimum
/// stake. Owner only.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`], [`LedgerError::EmptyString`] or
/// [`LedgerError::AddressUnauthorised`], checked in that order.
#[utoipa::path(
    put,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Update a pool",
    description = "Replaces name, description and minimum stake. Existing escrows keep their balances.",
    params(
        ("id" = String, Path, description = "Pool id (32-byte hex)"),
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = PoolRequest,
    responses(
        (status = 200, description = "Pool updated", body = PoolDetailResponse),
        (status = 400, description = "Empty name", body = ErrorResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn update_pool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PoolRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let pool_id: PoolId = id.parse()?;
    let pool = state
        .ledger_service
        .update_pool(&caller, pool_id, req.name, req.description, req.min_stake)
        .await?;
    Ok(Json(PoolDetailResponse::from(pool)))
}

/// `DELETE /pools/:id` — Remove a pool. Owner only.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`] or
/// [`LedgerError::AddressUnauthorised`].
#[utoipa::path(
    delete,
    path = "/api/v1/pools/{id}",
    tag = "Pools",
    summary = "Delete a pool",
    description = "Removes the pool. Escrows opened under it are left untouched.",
    params(
        ("id" = String, Path, description = "Pool id (32-byte hex)"),
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    responses(
        (status = 204, description = "Pool deleted"),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn delete_pool(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let pool_id: PoolId = id.parse()?;
    state.ledger_service.delete_pool(&caller, pool_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /pools/:id/min-stake` — Minimum stake required to open an escrow.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{id}/min-stake",
    tag = "Pools",
    summary = "Get a pool's minimum stake",
    params(
        ("id" = String, Path, description = "Pool id (32-byte hex)"),
    ),
    responses(
        (status = 200, description = "Minimum stake", body = MinStakeResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_min_stake(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let pool_id: PoolId = id.parse()?;
    let min_stake = state.ledger_service.min_stake(pool_id).await?;
    Ok(Json(MinStakeResponse { pool_id, min_stake }))
}

/// Pool registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route(
            "/pools/{id}",
            get(get_pool).put(update_pool).delete(delete_pool),
        )
        .route("/pools/{id}/min-stake", get(get_min_stake))
}
