//! Escrow ledger handlers: create, deposit, withdraw, get, list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller::Caller;
use crate::api::dto::{
    BalanceResponse, CreateEscrowRequest, DepositRequest, EscrowListParams, EscrowListResponse,
    EscrowResponse, PaginationMeta, WithdrawRequest,
};
use crate::api::json::ApiJson;
use crate::app_state::AppState;
use crate::domain::EscrowId;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /escrows` — Open an escrow with the attached value as stake.
///
/// # Errors
///
/// Returns [`LedgerError::RegistryNotBound`],
/// [`LedgerError::RegistryMismatch`], [`LedgerError::KeyNotFound`],
/// [`LedgerError::InsufficientStake`] or [`LedgerError::BalanceOverflow`].
#[utoipa::path(
    post,
    path = "/api/v1/escrows",
    tag = "Escrows",
    summary = "Create an escrow",
    description = "Opens an escrow owned by the caller under the given pool. The attached value must be at least the pool's minimum stake and becomes the initial balance.",
    params(
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = CreateEscrowRequest,
    responses(
        (status = 201, description = "Escrow created", body = EscrowResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 409, description = "Registry not bound or mismatched", body = ErrorResponse),
        (status = 422, description = "Stake below pool minimum", body = ErrorResponse),
    )
)]
pub async fn create_escrow(
    State(state): State<AppState>,
    Caller(caller): Caller,
    ApiJson(req): ApiJson<CreateEscrowRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let escrow = state
        .ledger_service
        .create_escrow(&caller, req.pool_id, req.value)
        .await?;
    Ok((StatusCode::CREATED, Json(EscrowResponse::from(escrow))))
}

/// `GET /escrows` — List escrows, optionally filtered by owner and pool.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRequest`] on malformed filters.
#[utoipa::path(
    get,
    path = "/api/v1/escrows",
    tag = "Escrows",
    summary = "List escrows",
    params(EscrowListParams),
    responses(
        (status = 200, description = "Paginated escrow list", body = EscrowListResponse),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
    )
)]
pub async fn list_escrows(
    State(state): State<AppState>,
    Query(params): Query<EscrowListParams>,
) -> Result<impl IntoResponse, LedgerError> {
    let (owner, pool_id) = params.filters()?;
    let escrows = state
        .ledger_service
        .list_escrows(owner.as_ref(), pool_id)
        .await;
    let (page, pagination) = PaginationMeta::paginate(escrows, params.page, params.per_page);

    Ok(Json(EscrowListResponse {
        data: page.into_iter().map(EscrowResponse::from).collect(),
        pagination,
    }))
}

/// `GET /escrows/:id` — Get an escrow.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`] if the escrow does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/escrows/{id}",
    tag = "Escrows",
    summary = "Get an escrow",
    params(
        ("id" = String, Path, description = "Escrow id (32-byte hex)"),
    ),
    responses(
        (status = 200, description = "Escrow", body = EscrowResponse),
        (status = 404, description = "Escrow not found", body = ErrorResponse),
    )
)]
pub async fn get_escrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let escrow_id: EscrowId = id.parse()?;
    let escrow = state.ledger_service.get_escrow(escrow_id).await?;
    Ok(Json(EscrowResponse::from(escrow)))
}

/// `POST /escrows/:id/deposit` — Add the attached value to an escrow.
/// Owner only.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`],
/// [`LedgerError::AddressUnauthorised`] or [`LedgerError::BalanceOverflow`].
#[utoipa::path(
    post,
    path = "/api/v1/escrows/{id}/deposit",
    tag = "Escrows",
    summary = "Deposit into an escrow",
    params(
        ("id" = String, Path, description = "Escrow id (32-byte hex)"),
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = DepositRequest,
    responses(
        (status = 200, description = "New balance", body = BalanceResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Escrow not found", body = ErrorResponse),
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<DepositRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let escrow_id: EscrowId = id.parse()?;
    let balance = state
        .ledger_service
        .deposit(&caller, escrow_id, req.value)
        .await?;
    Ok(Json(BalanceResponse {
        escrow_id,
        amount: req.value,
        balance,
    }))
}

/// `POST /escrows/:id/withdraw` — Pay an amount out of an escrow to its
/// owner. Owner only.
///
/// # Errors
///
/// Returns [`LedgerError::KeyNotFound`],
/// [`LedgerError::AddressUnauthorised`],
/// [`LedgerError::InsufficientBalance`] or [`LedgerError::TransferFailed`].
#[utoipa::path(
    post,
    path = "/api/v1/escrows/{id}/withdraw",
    tag = "Escrows",
    summary = "Withdraw from an escrow",
    description = "Debits the escrow and transfers the amount to its owner. A failed transfer leaves the balance unchanged.",
    params(
        ("id" = String, Path, description = "Escrow id (32-byte hex)"),
        ("x-caller-address" = String, Header, description = "Calling account"),
    ),
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "New balance", body = BalanceResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Escrow not found", body = ErrorResponse),
        (status = 422, description = "Insufficient balance", body = ErrorResponse),
        (status = 502, description = "Transfer failed", body = ErrorResponse),
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<WithdrawRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let escrow_id: EscrowId = id.parse()?;
    let balance = state
        .ledger_service
        .withdraw(&caller, escrow_id, req.amount)
        .await?;
    Ok(Json(BalanceResponse {
        escrow_id,
        amount: req.amount,
        balance,
    }))
}

/// Escrow ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/escrows", post(create_escrow).get(list_escrows))
        .route("/escrows/{id}", get(get_escrow))
        .route("/escrows/{id}/deposit", post(deposit))
        .route("/escrows/{id}/withdraw", post(withdraw))
}
