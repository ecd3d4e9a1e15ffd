//! Escrow DTOs: create, deposit, withdraw, and read.
//!
//! `value` fields carry the native value attached to the call; there is
//! no separate amount parameter for create and deposit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Address, Amount, Escrow, EscrowId, PoolId};

/// Request body for `POST /escrows`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEscrowRequest {
    /// Pool to stake against.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Attached stake (string-encoded u128).
    #[schema(value_type = String, example = "1050975209")]
    pub value: Amount,
}

/// Request body for `POST /escrows/:id/deposit`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DepositRequest {
    /// Attached value (string-encoded u128).
    #[schema(value_type = String)]
    pub value: Amount,
}

/// Request body for `POST /escrows/:id/withdraw`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct WithdrawRequest {
    /// Amount to pay out (string-encoded u128).
    #[schema(value_type = String)]
    pub amount: Amount,
}

/// Escrow record as returned by create and get.
#[derive(Debug, Serialize, ToSchema)]
pub struct EscrowResponse {
    /// Escrow identifier.
    #[schema(value_type = String)]
    pub escrow_id: EscrowId,
    /// Pool the escrow was opened under.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Escrow owner.
    #[schema(value_type = String)]
    pub owner: Address,
    /// Current balance (string-encoded).
    #[schema(value_type = String)]
    pub balance: Amount,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last balance change.
    pub updated_at: DateTime<Utc>,
}

impl From<Escrow> for EscrowResponse {
    fn from(escrow: Escrow) -> Self {
        Self {
            escrow_id: escrow.escrow_id,
            pool_id: escrow.pool_id,
            owner: escrow.owner,
            balance: escrow.balance,
            created_at: escrow.created_at,
            updated_at: escrow.updated_at,
        }
    }
}

/// Response body for deposit and withdraw.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Escrow identifier.
    #[schema(value_type = String)]
    pub escrow_id: EscrowId,
    /// Amount moved by the call (string-encoded).
    #[schema(value_type = String)]
    pub amount: Amount,
    /// Balance after the call (string-encoded).
    #[schema(value_type = String)]
    pub balance: Amount,
}

/// Paginated list response for `GET /escrows`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EscrowListResponse {
    /// Escrow records.
    pub data: Vec<EscrowResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /accounts/:address/payouts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PayoutResponse {
    /// Account address.
    #[schema(value_type = String)]
    pub account: Address,
    /// Total value paid out to the account by withdrawals.
    #[schema(value_type = String)]
    pub total_paid: Amount,
}
