//! Pool record stored in the [`super::PoolRegistry`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, Amount, PoolId};

/// A named pool with a minimum stake requirement.
///
/// `pool_id`, `owner` and `created_at` are immutable. `name`,
/// `description` and `min_stake` are overwritten in place by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pool {
    /// Unique pool identifier.
    pub pool_id: PoolId,

    /// Account that created the pool.
    pub owner: Address,

    /// Non-empty display name.
    pub name: String,

    /// Free-form description, may be empty.
    pub description: String,

    /// Minimum stake required to open an escrow under this pool.
    pub min_stake: Amount,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update.
    pub updated_at: DateTime<Utc>,
}

impl Pool {
    /// Creates a new `Pool` record stamped with the current time.
    #[must_use]
    pub fn new(
        pool_id: PoolId,
        owner: Address,
        name: String,
        description: String,
        min_stake: Amount,
    ) -> Self {
        let now = Utc::now();
        Self {
            pool_id,
            owner,
            name,
            description,
            min_stake,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Lightweight summary of a pool for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PoolSummary {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Pool owner.
    pub owner: Address,
    /// Pool name.
    pub name: String,
    /// Minimum stake.
    pub min_stake: Amount,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Pool> for PoolSummary {
    fn from(pool: &Pool) -> Self {
        Self {
            pool_id: pool.pool_id,
            owner: pool.owner,
            name: pool.name.clone(),
            min_stake: pool.min_stake,
            created_at: pool.created_at,
        }
    }
}
