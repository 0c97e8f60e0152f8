//! The payment-token collaborator.
//!
//! Transfers are assumed atomic and fail loudly with a typed error; the
//! engine never inspects a boolean success flag. The approve-style selector
//! the payload inspector classifies on is defined here from the canonical
//! signature.

use core::fmt::Debug;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use auto_impl::auto_impl;

use crate::TokenError;

sol! {
    /// The allowance-granting call an approval-sponsored operation performs
    /// against the payment token.
    #[allow(missing_docs)]
    function approve(address spender, uint256 value) external returns (bool);
}

/// Selector of the approve-style allowance-granting call.
pub const APPROVE_SELECTOR: [u8; 4] = approveCall::SELECTOR;

/// Transfer and allowance primitives of the payment token.
#[auto_impl(&mut, Box)]
pub trait PaymentToken: Debug {
    /// Remaining amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Moves `amount` from `from` to `to` on the engine's authority,
    /// consuming allowance. Fails loudly when balance or allowance cannot
    /// cover the amount.
    fn transfer_from(&mut self, from: Address, to: Address, amount: U256)
        -> Result<(), TokenError>;

    /// Moves `amount` out of the engine's own balance to `to`. Fails loudly
    /// when the balance cannot cover the amount.
    fn transfer(&mut self, to: Address, amount: U256) -> Result<(), TokenError>;
}
