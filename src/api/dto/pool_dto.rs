//! Pool-related DTOs for create, update, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Address, Amount, Pool, PoolId, PoolSummary};

/// Request body for `POST /pools` and `PUT /pools/:id`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PoolRequest {
    /// Pool name. Must not be empty.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Minimum stake (string-encoded u128).
    #[schema(value_type = String, example = "1050975209")]
    pub min_stake: Amount,
}

/// Response body for `POST /pools` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// Newly minted pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Pool owner (the caller).
    #[schema(value_type = String)]
    pub owner: Address,
}

/// Single pool detail for `GET /pools/:id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolDetailResponse {
    /// Pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Pool owner.
    #[schema(value_type = String)]
    pub owner: Address,
    /// Pool name.
    pub name: String,
    /// Pool description.
    pub description: String,
    /// Minimum stake (string-encoded).
    #[schema(value_type = String)]
    pub min_stake: Amount,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Pool> for PoolDetailResponse {
    fn from(pool: Pool) -> Self {
        Self {
            pool_id: pool.pool_id,
            owner: pool.owner,
            name: pool.name,
            description: pool.description,
            min_stake: pool.min_stake,
            created_at: pool.created_at,
            updated_at: pool.updated_at,
        }
    }
}

/// Pool summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolSummaryDto {
    /// Pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Pool owner.
    #[schema(value_type = String)]
    pub owner: Address,
    /// Pool name.
    pub name: String,
    /// Minimum stake (string-encoded).
    #[schema(value_type = String)]
    pub min_stake: Amount,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<PoolSummary> for PoolSummaryDto {
    fn from(summary: PoolSummary) -> Self {
        Self {
            pool_id: summary.pool_id,
            owner: summary.owner,
            name: summary.name,
            min_stake: summary.min_stake,
            created_at: summary.created_at,
        }
    }
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pool summaries.
    pub data: Vec<PoolSummaryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /pools/:id/min-stake`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MinStakeResponse {
    /// Pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Minimum stake (string-encoded).
    #[schema(value_type = String)]
    pub min_stake: Amount,
}
