//! The sponsorship ledger: deferred native-unit debt per account.
//!
//! The ledger is process-wide state surviving across validate/settle pairs.
//! Only the settlement phase holds mutable access (the mutators are
//! crate-internal), which enforces the single-writer property by
//! construction. Entries are non-negative, grow only through deferred
//! settlements, and reset to zero exactly when a standard settlement
//! collects.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

/// Accumulated native-unit debt per account. Dereferences to the underlying
/// map for read-only iteration.
#[derive(Debug, Clone, Default, derive_more::Deref)]
pub struct SponsorshipLedger {
    #[deref]
    debts: HashMap<Address, U256>,
}

impl SponsorshipLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The account's current debt, zero when no entry exists.
    pub fn debt_of(&self, account: Address) -> U256 {
        self.debts.get(&account).copied().unwrap_or_default()
    }

    /// Adds `amount` to the account's debt, returning the new total.
    /// Returns `None` without mutating when the addition would overflow.
    pub(crate) fn accrue(&mut self, account: Address, amount: U256) -> Option<U256> {
        let new_total = self.debt_of(account).checked_add(amount)?;
        self.debts.insert(account, new_total);
        Some(new_total)
    }

    /// Resets the account's debt to zero, returning the amount cleared.
    pub(crate) fn clear(&mut self, account: Address) -> U256 {
        self.debts.remove(&account).unwrap_or_default()
    }
}
