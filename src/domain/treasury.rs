//! Outbound value transfers.
//!
//! The [`super::EscrowLedger`] pays withdrawals through a [`Treasury`].
//! The ledger decrements the escrow balance before calling
//! [`Treasury::transfer`] and restores it if the transfer fails, so a
//! failed payout leaves no trace in ledger state.

use std::collections::HashMap;
use std::fmt;

use super::{Address, Amount};
use crate::error::LedgerError;

/// Destination of native value leaving the ledger.
pub trait Treasury: fmt::Debug + Send {
    /// Sends `amount` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::TransferFailed`] if the value cannot be
    /// delivered. The implementation must not have moved any value in
    /// that case.
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError>;
}

/// In-memory treasury that credits payouts to per-account totals.
#[derive(Debug, Default)]
pub struct PayoutBook {
    paid: HashMap<Address, Amount>,
    total: Amount,
}

impl PayoutBook {
    /// Creates an empty payout book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total value paid out to `account`.
    #[must_use]
    pub fn paid_to(&self, account: &Address) -> Amount {
        self.paid.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Total value paid out to all accounts.
    #[must_use]
    pub const fn total_paid(&self) -> Amount {
        self.total
    }
}

impl Treasury for PayoutBook {
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::TransferFailed(
                "cannot pay out to the zero address".to_string(),
            ));
        }
        let current = self.paid_to(to);
        let (Some(credited), Some(total)) = (
            current.checked_add(amount),
            self.total.checked_add(amount),
        ) else {
            return Err(LedgerError::TransferFailed(format!(
                "payout of {amount} to {to} overflows"
            )));
        };
        self.paid.insert(*to, credited);
        self.total = total;
        Ok(())
    }
}
