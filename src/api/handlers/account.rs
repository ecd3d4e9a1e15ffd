//! Account read endpoints.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::PayoutResponse;
use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::{ErrorResponse, LedgerError};

/// `GET /accounts/:address/payouts` — Total paid out to an account.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidRequest`] on a malformed address.
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{address}/payouts",
    tag = "Accounts",
    summary = "Total withdrawals paid to an account",
    params(
        ("address" = String, Path, description = "Account address (20-byte hex)"),
    ),
    responses(
        (status = 200, description = "Payout total", body = PayoutResponse),
        (status = 400, description = "Malformed address", body = ErrorResponse),
    )
)]
pub async fn get_payouts(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let account: Address = address.parse()?;
    let total_paid = state.ledger_service.paid_to(&account).await;
    Ok(Json(PayoutResponse {
        account,
        total_paid,
    }))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/accounts/{address}/payouts", get(get_payouts))
}
