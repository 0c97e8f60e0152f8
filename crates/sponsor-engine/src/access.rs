//! The allow-list collaborator gating sponsorship eligibility.

use core::fmt::Debug;
use std::collections::HashSet;

use alloy_primitives::Address;
use auto_impl::auto_impl;

use crate::AccessError;

/// Decides which accounts are eligible for sponsorship. Validation consults
/// this before any other check.
#[auto_impl(&, Box, Arc)]
pub trait AccessList: Debug {
    /// Whether `account` may have its operations sponsored.
    fn is_authorized(&self, account: Address) -> bool;
}

/// An owner-administered in-memory allow-list.
#[derive(Debug, Clone)]
pub struct InMemoryAccessList {
    owner: Address,
    allowed: HashSet<Address>,
}

impl InMemoryAccessList {
    /// Creates an empty allow-list administered by `owner`.
    pub fn new(owner: Address) -> Self {
        Self { owner, allowed: HashSet::new() }
    }

    /// Sets the authorization status of each account in `accounts` to the
    /// status at the same index in `statuses`. Owner-gated; the two slices
    /// must have equal length.
    pub fn set_authorized(
        &mut self,
        caller: Address,
        accounts: &[Address],
        statuses: &[bool],
    ) -> Result<(), AccessError> {
        if caller != self.owner {
            return Err(AccessError::NotOwner { caller });
        }
        if accounts.len() != statuses.len() {
            return Err(AccessError::LengthMismatch {
                accounts: accounts.len(),
                statuses: statuses.len(),
            });
        }
        for (account, status) in accounts.iter().zip(statuses) {
            if *status {
                self.allowed.insert(*account);
            } else {
                self.allowed.remove(account);
            }
        }
        Ok(())
    }
}

impl AccessList for InMemoryAccessList {
    fn is_authorized(&self, account: Address) -> bool {
        self.allowed.contains(&account)
    }
}
