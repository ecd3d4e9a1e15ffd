//! Per-participant escrows of native value.
//!
//! [`EscrowLedger`] owns every [`Escrow`] record and the custody total
//! backing them. Like the registry it is a synchronous state machine with
//! no internal locking; every operation validates first and mutates last,
//! so a rejected call leaves no trace.
//!
//! # Invariants
//!
//! - `custody` equals the sum of all escrow balances.
//! - No balance ever goes below zero (enforced by [`Amount`] arithmetic).
//! - During a withdrawal the balance is decremented before value leaves
//!   through the [`Treasury`], and restored if the transfer fails.

use std::collections::HashMap;

use super::event::{LedgerEvent, Receipt};
use super::key::KeyGenerator;
use super::pool_registry::StakeDirectory;
use super::treasury::Treasury;
use super::{Address, Amount, Escrow, EscrowId, PoolId};
use crate::error::LedgerError;

const ESCROW_KEY_NAMESPACE: &str = "stakepool/escrow";

/// Store of escrow records bound to one pool registry.
#[derive(Debug)]
pub struct EscrowLedger {
    admin: Address,
    bound_registry: Option<Address>,
    escrows: HashMap<EscrowId, Escrow>,
    custody: Amount,
    keys: KeyGenerator,
}

impl EscrowLedger {
    /// Creates an empty, unbound ledger administered by `admin`.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            bound_registry: None,
            escrows: HashMap::new(),
            custody: Amount::ZERO,
            keys: KeyGenerator::new(ESCROW_KEY_NAMESPACE),
        }
    }

    /// Administrator allowed to bind the registry.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Registry the ledger is currently bound to, if any.
    #[must_use]
    pub const fn bound_registry(&self) -> Option<Address> {
        self.bound_registry
    }

    /// Binds the ledger to the pool registry at `registry`.
    ///
    /// Rebinding is allowed; binding the same address again is a no-op
    /// apart from the emitted event.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnauthorisedAddress`] if `caller` is not the
    /// administrator.
    pub fn bind_registry(
        &mut self,
        caller: &Address,
        registry: Address,
    ) -> Result<Receipt<()>, LedgerError> {
        if *caller != self.admin {
            return Err(LedgerError::UnauthorisedAddress { caller: *caller });
        }
        self.bound_registry = Some(registry);
        Ok(Receipt::new((), LedgerEvent::RegistryBound { registry }))
    }

    /// Opens an escrow under `pool_id` holding the attached `stake`.
    /// Returns a snapshot of the new record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::RegistryNotBound`] before binding,
    /// [`LedgerError::RegistryMismatch`] if `directory` is not the bound
    /// registry, [`LedgerError::KeyNotFound`] if the pool does not exist,
    /// [`LedgerError::InsufficientStake`] if `stake` is below the pool's
    /// minimum, or [`LedgerError::BalanceOverflow`] if custody would
    /// overflow.
    pub fn create<D>(
        &mut self,
        caller: &Address,
        directory: &D,
        pool_id: PoolId,
        stake: Amount,
    ) -> Result<Receipt<Escrow>, LedgerError>
    where
        D: StakeDirectory + ?Sized,
    {
        let bound = self.bound_registry.ok_or(LedgerError::RegistryNotBound)?;
        if bound != directory.address() {
            return Err(LedgerError::RegistryMismatch {
                bound,
                presented: directory.address(),
            });
        }

        let required = directory.min_stake(pool_id)?;
        if stake < required {
            return Err(LedgerError::InsufficientStake {
                offered: stake,
                required,
            });
        }
        let custody = self
            .custody
            .checked_add(stake)
            .ok_or(LedgerError::BalanceOverflow)?;

        let stake_bytes = stake.get().to_be_bytes();
        let key = self
            .keys
            .next_key(caller, &[pool_id.as_key().as_bytes(), &stake_bytes]);
        let escrow_id = EscrowId::from_key(key);
        if self.escrows.contains_key(&escrow_id) {
            return Err(LedgerError::Internal(format!(
                "escrow key {escrow_id} minted twice"
            )));
        }

        let escrow = Escrow::new(escrow_id, pool_id, *caller, stake);
        self.escrows.insert(escrow_id, escrow.clone());
        self.custody = custody;

        let event = LedgerEvent::EscrowCreated {
            escrow_id,
            owner: *caller,
            pool_id,
            balance: stake,
        };
        Ok(Receipt::new(escrow, event))
    }

    /// Adds the attached `amount` to an escrow. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the escrow does not exist,
    /// [`LedgerError::AddressUnauthorised`] if `caller` is not its owner,
    /// or [`LedgerError::BalanceOverflow`] if the balance would overflow.
    pub fn deposit(
        &mut self,
        caller: &Address,
        escrow_id: EscrowId,
        amount: Amount,
    ) -> Result<Receipt<Amount>, LedgerError> {
        let escrow = self
            .escrows
            .get_mut(&escrow_id)
            .ok_or(LedgerError::KeyNotFound(*escrow_id.as_key()))?;
        if escrow.owner != *caller {
            return Err(LedgerError::AddressUnauthorised { caller: *caller });
        }

        let (Some(balance), Some(custody)) = (
            escrow.balance.checked_add(amount),
            self.custody.checked_add(amount),
        ) else {
            return Err(LedgerError::BalanceOverflow);
        };

        escrow.balance = balance;
        escrow.updated_at = chrono::Utc::now();
        self.custody = custody;

        let event = LedgerEvent::EscrowDeposited {
            escrow_id,
            owner: escrow.owner,
            amount,
            balance,
        };
        Ok(Receipt::new(balance, event))
    }

    /// Pays `amount` out of an escrow to its owner through `treasury`.
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the escrow does not exist,
    /// [`LedgerError::AddressUnauthorised`] if `caller` is not its owner,
    /// [`LedgerError::InsufficientBalance`] if `amount` exceeds the
    /// balance, or the treasury's error (typically
    /// [`LedgerError::TransferFailed`]) if the payout cannot be made. In
    /// every error case the ledger is left unchanged.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        escrow_id: EscrowId,
        amount: Amount,
        treasury: &mut dyn Treasury,
    ) -> Result<Receipt<Amount>, LedgerError> {
        let escrow = self
            .escrows
            .get_mut(&escrow_id)
            .ok_or(LedgerError::KeyNotFound(*escrow_id.as_key()))?;
        if escrow.owner != *caller {
            return Err(LedgerError::AddressUnauthorised { caller: *caller });
        }

        let previous_balance = escrow.balance;
        let previous_custody = self.custody;
        let balance =
            previous_balance
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientBalance {
                    requested: amount,
                    available: previous_balance,
                })?;
        let custody = previous_custody.checked_sub(amount).ok_or_else(|| {
            LedgerError::Internal(format!(
                "custody {previous_custody} below escrow balance {previous_balance}"
            ))
        })?;

        // Debit before the value leaves.
        escrow.balance = balance;
        self.custody = custody;

        if let Err(err) = treasury.transfer(caller, amount) {
            escrow.balance = previous_balance;
            self.custody = previous_custody;
            return Err(err);
        }
        escrow.updated_at = chrono::Utc::now();

        let event = LedgerEvent::EscrowWithdrawn {
            escrow_id,
            owner: escrow.owner,
            amount,
            balance,
        };
        Ok(Receipt::new(balance, event))
    }

    /// Returns the escrow record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the escrow does not exist.
    pub fn get(&self, escrow_id: EscrowId) -> Result<&Escrow, LedgerError> {
        self.escrows
            .get(&escrow_id)
            .ok_or(LedgerError::KeyNotFound(*escrow_id.as_key()))
    }

    /// Returns escrows matching the optional owner and pool filters,
    /// ordered by creation time.
    #[must_use]
    pub fn list(&self, owner: Option<&Address>, pool_id: Option<PoolId>) -> Vec<Escrow> {
        let mut escrows: Vec<Escrow> = self
            .escrows
            .values()
            .filter(|e| owner.is_none_or(|o| e.owner == *o))
            .filter(|e| pool_id.is_none_or(|p| e.pool_id == p))
            .cloned()
            .collect();
        escrows.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.escrow_id.cmp(&b.escrow_id))
        });
        escrows
    }

    /// Total value held across all escrows.
    #[must_use]
    pub const fn custody(&self) -> Amount {
        self.custody
    }

    /// Returns the number of escrows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.escrows.len()
    }

    /// Returns `true` if no escrow has been opened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.escrows.is_empty()
    }
}
