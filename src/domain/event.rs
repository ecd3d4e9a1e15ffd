//! Notifications emitted by committed operations.
//!
//! Every successful mutation on the [`super::PoolRegistry`] or the
//! [`super::EscrowLedger`] yields exactly one [`LedgerEvent`], returned to
//! the caller inside a [`Receipt`]. The service layer publishes it on the
//! [`super::EventBus`] once the operation has committed. Field order
//! matches the order consumers use to extract identifiers.

use serde::Serialize;

use super::{Address, Amount, EscrowId, Key, PoolId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A pool was created.
    PoolCreated {
        /// New pool identifier.
        pool_id: PoolId,
        /// Creator and owner.
        owner: Address,
        /// Pool name.
        name: String,
        /// Pool description.
        description: String,
        /// Minimum stake.
        min_stake: Amount,
    },

    /// A pool's mutable fields were overwritten.
    PoolUpdated {
        /// Pool identifier.
        pool_id: PoolId,
        /// Pool owner.
        owner: Address,
        /// New name.
        name: String,
        /// New description.
        description: String,
        /// New minimum stake.
        min_stake: Amount,
    },

    /// A pool was removed from the registry.
    PoolDeleted {
        /// Removed pool identifier.
        pool_id: PoolId,
        /// Owner that removed it.
        owner: Address,
    },

    /// The escrow ledger was bound to a pool registry.
    RegistryBound {
        /// Address of the bound registry.
        registry: Address,
    },

    /// An escrow was opened.
    EscrowCreated {
        /// New escrow identifier.
        escrow_id: EscrowId,
        /// Participant that opened it.
        owner: Address,
        /// Pool it was opened under.
        pool_id: PoolId,
        /// Initial balance (the stake).
        balance: Amount,
    },

    /// Value was added to an escrow.
    EscrowDeposited {
        /// Escrow identifier.
        escrow_id: EscrowId,
        /// Escrow owner.
        owner: Address,
        /// Deposited amount.
        amount: Amount,
        /// Balance after the deposit.
        balance: Amount,
    },

    /// Value was paid out of an escrow.
    EscrowWithdrawn {
        /// Escrow identifier.
        escrow_id: EscrowId,
        /// Escrow owner, who received the payout.
        owner: Address,
        /// Withdrawn amount.
        amount: Amount,
        /// Balance after the withdrawal.
        balance: Amount,
    },
}

impl LedgerEvent {
    /// Returns every record key this event refers to.
    ///
    /// Used for subscription filtering: an escrow event matches both its
    /// escrow key and, for creation, the pool key.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        match self {
            Self::PoolCreated { pool_id, .. }
            | Self::PoolUpdated { pool_id, .. }
            | Self::PoolDeleted { pool_id, .. } => vec![*pool_id.as_key()],
            Self::RegistryBound { .. } => Vec::new(),
            Self::EscrowCreated {
                escrow_id, pool_id, ..
            } => vec![*escrow_id.as_key(), *pool_id.as_key()],
            Self::EscrowDeposited { escrow_id, .. } | Self::EscrowWithdrawn { escrow_id, .. } => {
                vec![*escrow_id.as_key()]
            }
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "pool_created",
            Self::PoolUpdated { .. } => "pool_updated",
            Self::PoolDeleted { .. } => "pool_deleted",
            Self::RegistryBound { .. } => "registry_bound",
            Self::EscrowCreated { .. } => "escrow_created",
            Self::EscrowDeposited { .. } => "escrow_deposited",
            Self::EscrowWithdrawn { .. } => "escrow_withdrawn",
        }
    }
}

/// Result of a committed mutation: the operation output plus its event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt<T> {
    /// Operation output (e.g. the newly minted id).
    pub output: T,
    /// Notification describing the committed change.
    pub event: LedgerEvent,
}

impl<T> Receipt<T> {
    /// Pairs an output with its event.
    #[must_use]
    pub const fn new(output: T, event: LedgerEvent) -> Self {
        Self { output, event }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pool_id() -> PoolId {
        PoolId::from_key(Key::from_short_string("pool"))
    }

    fn escrow_id() -> EscrowId {
        EscrowId::from_key(Key::from_short_string("escrow"))
    }

    #[test]
    fn escrow_created_matches_both_keys() {
        let event = LedgerEvent::EscrowCreated {
            escrow_id: escrow_id(),
            owner: Address::from_bytes([1u8; 20]),
            pool_id: pool_id(),
            balance: Amount::new(5),
        };
        let keys = event.keys();
        assert!(keys.contains(escrow_id().as_key()));
        assert!(keys.contains(pool_id().as_key()));
        assert_eq!(event.event_type_str(), "escrow_created");
    }

    #[test]
    fn registry_bound_has_no_keys() {
        let event = LedgerEvent::RegistryBound {
            registry: Address::derive("registry"),
        };
        assert!(event.keys().is_empty());
    }

    #[test]
    fn pool_created_serializes_fields_in_order() {
        let event = LedgerEvent::PoolCreated {
            pool_id: pool_id(),
            owner: Address::from_bytes([2u8; 20]),
            name: "Lorem Ipsum".to_string(),
            description: "lorem ipsum".to_string(),
            min_stake: Amount::new(1_050_975_209),
        };
        let Ok(json) = serde_json::to_string(&event) else {
            panic!("serialization failed");
        };
        assert!(json.starts_with("{\"event_type\":\"pool_created\",\"pool_id\""));
        let owner_at = json.find("\"owner\"").unwrap_or(usize::MAX);
        let stake_at = json.find("\"min_stake\":\"1050975209\"").unwrap_or(0);
        assert!(owner_at < stake_at);
    }
}
