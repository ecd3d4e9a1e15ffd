//! Escrow record stored in the [`super::EscrowLedger`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, Amount, EscrowId, PoolId};

/// Native value locked by one participant against one pool.
///
/// Only `balance` and `updated_at` ever change. An escrow has a single
/// lifecycle state (active) and is never removed, even at zero balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Escrow {
    /// Unique escrow identifier.
    pub escrow_id: EscrowId,

    /// Pool the escrow was opened under. The pool may since have been
    /// deleted.
    pub pool_id: PoolId,

    /// Participant who opened the escrow; the only account allowed to
    /// deposit or withdraw.
    pub owner: Address,

    /// Value currently held.
    pub balance: Amount,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last balance change.
    pub updated_at: DateTime<Utc>,
}

impl Escrow {
    /// Creates a new `Escrow` holding the initial stake.
    #[must_use]
    pub fn new(escrow_id: EscrowId, pool_id: PoolId, owner: Address, stake: Amount) -> Self {
        let now = Utc::now();
        Self {
            escrow_id,
            pool_id,
            owner,
            balance: stake,
            created_at: now,
            updated_at: now,
        }
    }
}
