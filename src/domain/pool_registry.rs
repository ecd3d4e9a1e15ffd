//! Pool catalogue with owner-guarded mutation.
//!
//! [`PoolRegistry`] is a plain synchronous state machine. It holds no
//! locks: callers serialize access (the service keeps it behind a single
//! mutex), and every operation either commits fully or returns an error
//! without touching state.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::event::{LedgerEvent, Receipt};
use super::key::KeyGenerator;
use super::pool::{Pool, PoolSummary};
use super::{Address, Amount, PoolId};
use crate::error::LedgerError;

const POOL_KEY_NAMESPACE: &str = "stakepool/pool";

/// Read-only view of pool stake requirements.
///
/// This is the only surface the [`super::EscrowLedger`] sees of the
/// registry it is bound to.
pub trait StakeDirectory {
    /// Address the directory is deployed at.
    fn address(&self) -> Address;

    /// Minimum stake of the given pool.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
    fn min_stake(&self, pool_id: PoolId) -> Result<Amount, LedgerError>;
}

/// Central store for all pools.
#[derive(Debug)]
pub struct PoolRegistry {
    address: Address,
    pools: HashMap<PoolId, Pool>,
    keys: KeyGenerator,
}

impl PoolRegistry {
    /// Creates an empty registry deployed at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            pools: HashMap::new(),
            keys: KeyGenerator::new(POOL_KEY_NAMESPACE),
        }
    }

    /// Creates a pool owned by `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmptyString`] if `name` is empty.
    pub fn create_pool(
        &mut self,
        caller: &Address,
        name: String,
        description: String,
        min_stake: Amount,
    ) -> Result<Receipt<PoolId>, LedgerError> {
        if name.is_empty() {
            return Err(LedgerError::EmptyString);
        }

        let stake_bytes = min_stake.get().to_be_bytes();
        let key = self.keys.next_key(
            caller,
            &[name.as_bytes(), description.as_bytes(), &stake_bytes],
        );
        let pool_id = PoolId::from_key(key);

        let pool = Pool::new(pool_id, *caller, name, description, min_stake);
        let event = LedgerEvent::PoolCreated {
            pool_id,
            owner: pool.owner,
            name: pool.name.clone(),
            description: pool.description.clone(),
            min_stake,
        };

        match self.pools.entry(pool_id) {
            Entry::Occupied(_) => {
                return Err(LedgerError::Internal(format!(
                    "pool key {pool_id} minted twice"
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(pool);
            }
        }

        Ok(Receipt::new(pool_id, event))
    }

    /// Overwrites the mutable fields of a pool and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist,
    /// [`LedgerError::EmptyString`] if `name` is empty, or
    /// [`LedgerError::AddressUnauthorised`] if `caller` is not the owner.
    pub fn update_pool(
        &mut self,
        caller: &Address,
        pool_id: PoolId,
        name: String,
        description: String,
        min_stake: Amount,
    ) -> Result<Receipt<Pool>, LedgerError> {
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or(LedgerError::KeyNotFound(*pool_id.as_key()))?;
        if name.is_empty() {
            return Err(LedgerError::EmptyString);
        }
        if pool.owner != *caller {
            return Err(LedgerError::AddressUnauthorised { caller: *caller });
        }

        pool.name = name;
        pool.description = description;
        pool.min_stake = min_stake;
        pool.updated_at = chrono::Utc::now();

        let event = LedgerEvent::PoolUpdated {
            pool_id,
            owner: pool.owner,
            name: pool.name.clone(),
            description: pool.description.clone(),
            min_stake,
        };
        Ok(Receipt::new(pool.clone(), event))
    }

    /// Removes a pool. Escrows opened under it are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist or
    /// [`LedgerError::AddressUnauthorised`] if `caller` is not the owner.
    pub fn delete_pool(
        &mut self,
        caller: &Address,
        pool_id: PoolId,
    ) -> Result<Receipt<Pool>, LedgerError> {
        let Entry::Occupied(slot) = self.pools.entry(pool_id) else {
            return Err(LedgerError::KeyNotFound(*pool_id.as_key()));
        };
        if slot.get().owner != *caller {
            return Err(LedgerError::AddressUnauthorised { caller: *caller });
        }

        let pool = slot.remove();
        let event = LedgerEvent::PoolDeleted {
            pool_id,
            owner: pool.owner,
        };
        Ok(Receipt::new(pool, event))
    }

    /// Returns the pool record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the pool does not exist.
    pub fn get(&self, pool_id: PoolId) -> Result<&Pool, LedgerError> {
        self.pools
            .get(&pool_id)
            .ok_or(LedgerError::KeyNotFound(*pool_id.as_key()))
    }

    /// Returns summaries of all pools, optionally filtered by owner,
    /// ordered by creation time.
    #[must_use]
    pub fn list(&self, owner_filter: Option<&Address>) -> Vec<PoolSummary> {
        let mut summaries: Vec<PoolSummary> = self
            .pools
            .values()
            .filter(|pool| owner_filter.is_none_or(|owner| pool.owner == *owner))
            .map(PoolSummary::from)
            .collect();
        summaries.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.pool_id.cmp(&b.pool_id))
        });
        summaries
    }

    /// Returns the number of pools in the registry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if the registry contains no pools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl StakeDirectory for PoolRegistry {
    fn address(&self) -> Address {
        self.address
    }

    fn min_stake(&self, pool_id: PoolId) -> Result<Amount, LedgerError> {
        self.get(pool_id).map(|pool| pool.min_stake)
    }
}
